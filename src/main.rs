use clap::Parser;
use strling::cli::{self, args::StrlingArgs};
use tracing::Level;

fn main() {
    let args = StrlingArgs::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    std::process::exit(cli::run(args));
}
