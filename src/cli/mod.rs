//! CLI module for MarketConnect
//!
//! Provides command-line interface for:
//! - serve: Start the HTTP API
//! - validate: One-shot validation of a JSON record
//! - schemas: List registered schema names

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{build_registry, init_logging, run, run_command, serve, validate, validate_record};
pub use config::AppConfig;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_input, write_error, write_response};
