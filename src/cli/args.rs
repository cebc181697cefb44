//! CLI argument definitions using clap
//!
//! Commands:
//! - marketconnect serve [--config <path>]
//! - marketconnect validate --schema <name> [--input <path>] [--schema-dir <dir>]
//! - marketconnect schemas [--schema-dir <dir>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MarketConnect - request validation service for the marketplace API
#[derive(Parser, Debug)]
#[command(name = "marketconnect")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate one JSON record against a named schema and print the result
    Validate {
        /// Schema name, e.g. customerRegister
        #[arg(long)]
        schema: String,

        /// File holding the record; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// Directory of additional schema files
        #[arg(long)]
        schema_dir: Option<PathBuf>,
    },

    /// List registered schema names
    Schemas {
        /// Directory of additional schema files
        #[arg(long)]
        schema_dir: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
