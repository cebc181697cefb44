//! MarketConnect CLI entry point
//!
//! Parses arguments, dispatches to the CLI module, prints errors to stderr
//! unless already written to stdout, and exits non-zero on failure. All
//! logic lives in `cli`.

use marketconnect::cli;

fn main() {
    if let Err(e) = cli::run() {
        if !e.is_reported() {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}
