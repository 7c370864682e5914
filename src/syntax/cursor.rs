//! Character cursor over the post-directive pattern text.
//!
//! Positions are character offsets. Free-spacing mode makes
//! [`Cursor::skip_ws_and_comments`] discard whitespace and `#` comments,
//! except inside a character class where every character is significant.

/// Saved cursor position, restored to undo a speculative read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    pos: usize,
    extended: bool,
    class_depth: usize,
}

impl Cursor {
    pub fn new(text: &str, extended: bool) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            extended,
            class_depth: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_extended(&self) -> bool {
        self.extended
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// The character `n` places ahead, without consuming anything.
    pub fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    pub fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    pub fn take(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    /// Consumes `expected` if it is next; reports whether it did.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            return true;
        }
        false
    }

    /// Consumes `s` if the input continues with it exactly.
    pub fn match_str(&mut self, s: &str) -> bool {
        let mut offset = 0;
        for expected in s.chars() {
            if self.peek_at(offset) != Some(expected) {
                return false;
            }
            offset += 1;
        }
        self.pos += offset;
        true
    }

    /// Consumes characters while `pred` holds and returns them.
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            out.push(ch);
            self.pos += 1;
        }
        out
    }

    /// In free-spacing mode outside a class, skips whitespace and `#` comments
    /// up to the end of their line. Otherwise does nothing.
    pub fn skip_ws_and_comments(&mut self) {
        if !self.extended || self.class_depth > 0 {
            return;
        }
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.pos += 1;
            } else if ch == '#' {
                while let Some(c) = self.take() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    pub fn enter_class(&mut self) {
        self.class_depth += 1;
    }

    pub fn leave_class(&mut self) {
        self.class_depth = self.class_depth.saturating_sub(1);
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.0;
    }

    /// Looks ahead from the current position for `close` on the same line,
    /// returning the characters before it. Consumes nothing.
    pub fn scan_to_on_line(&self, close: char) -> Option<String> {
        let mut out = String::new();
        for &ch in &self.chars[self.pos.min(self.chars.len())..] {
            if ch == close {
                return Some(out);
            }
            if ch == '\n' {
                return None;
            }
            out.push(ch);
        }
        None
    }
}

#[cfg(test)]
mod cursor_tests {
    use super::*;

    #[test]
    fn peek_and_take_walk_characters() {
        let mut cur = Cursor::new("aé", false);
        assert_eq!(cur.peek_at(1), Some('é'));
        assert_eq!(cur.take(), Some('a'));
        assert_eq!(cur.take(), Some('é'));
        assert!(cur.eof());
        assert_eq!(cur.take(), None);
        assert_eq!(cur.pos(), 2);
    }

    #[test]
    fn match_str_is_all_or_nothing() {
        let mut cur = Cursor::new("?<=x", false);
        assert!(!cur.match_str("?<!"));
        assert_eq!(cur.pos(), 0);
        assert!(cur.match_str("?<="));
        assert_eq!(cur.pos(), 3);
    }

    #[test]
    fn free_spacing_skips_comments_outside_classes_only() {
        let mut cur = Cursor::new("  # note\n a", true);
        cur.skip_ws_and_comments();
        assert_eq!(cur.peek(), Some('a'));

        let mut cur = Cursor::new(" a", true);
        cur.enter_class();
        cur.skip_ws_and_comments();
        assert_eq!(cur.peek(), Some(' '));
        cur.leave_class();
        cur.skip_ws_and_comments();
        assert_eq!(cur.peek(), Some('a'));

        let mut plain = Cursor::new(" a", false);
        plain.skip_ws_and_comments();
        assert_eq!(plain.pos(), 0);
    }

    #[test]
    fn checkpoint_restores_position() {
        let mut cur = Cursor::new("{abc", false);
        let mark = cur.checkpoint();
        cur.take();
        cur.take();
        cur.restore(mark);
        assert_eq!(cur.peek(), Some('{'));
    }

    #[test]
    fn scan_stops_at_newline() {
        let cur = Cursor::new("1,x}", false);
        assert_eq!(cur.scan_to_on_line('}').as_deref(), Some("1,x"));
        let cur = Cursor::new("1\n}", false);
        assert_eq!(cur.scan_to_on_line('}'), None);
    }
}
