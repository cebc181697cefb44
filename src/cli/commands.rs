//! CLI command implementations

use std::path::Path;

use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::http_server::HttpServer;
use crate::schema::{Record, SchemaLoader, SchemaRegistry, SchemaValidator, ValidationErrors};

use super::args::{Cli, Command};
use super::config::AppConfig;
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_error, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}

/// Run a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve { config } => serve(config.as_deref()),
        Command::Validate {
            schema,
            input,
            schema_dir,
        } => {
            init_logging("warn");
            validate(&schema, input.as_deref(), schema_dir.as_deref())
        }
        Command::Schemas { schema_dir } => {
            init_logging("warn");
            schemas(schema_dir.as_deref())
        }
    }
}

/// Installs the global tracing subscriber on stderr.
///
/// `RUST_LOG` takes precedence over `default_level`. A second call is a no-op.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Builtin schemas plus any schema files in `schema_dir`
pub fn build_registry(schema_dir: Option<&Path>) -> CliResult<SchemaRegistry> {
    let mut registry = SchemaRegistry::builtin()?;

    if let Some(dir) = schema_dir {
        let mut loader = SchemaLoader::new(dir);
        loader.load_all()?;
        registry.merge_loaded(loader);
    }

    Ok(registry)
}

/// Start the HTTP server and block until it stops
pub fn serve(config_path: Option<&Path>) -> CliResult<()> {
    let config = match config_path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    init_logging(&config.log_level);

    let registry = build_registry(config.schema_dir.as_deref())?;
    info!(schemas = registry.len(), "schema registry ready");

    let server = HttpServer::with_config(config.server, &registry)?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to start runtime: {}", e)))?;
    runtime
        .block_on(server.start())
        .map_err(|e| CliError::serve_failed(e.to_string()))
}

/// Validate a record from a file or stdin and print the outcome
pub fn validate(schema_name: &str, input: Option<&Path>, schema_dir: Option<&Path>) -> CliResult<()> {
    let registry = build_registry(schema_dir)?;
    let data = read_input(input)?;

    match validate_record(&registry, schema_name, &data)? {
        Ok(sanitized) => write_response(Value::Object(sanitized)),
        Err(errors) => {
            write_error(ValidationErrors::CODE, &errors.joined())?;
            Err(CliError::validation_failed(errors.joined()))
        }
    }
}

/// Runs `schema_name` over `data`.
///
/// The outer error is a usage problem (unknown schema, non-object input);
/// the inner result is the validation outcome.
pub fn validate_record(
    registry: &SchemaRegistry,
    schema_name: &str,
    data: &Value,
) -> CliResult<Result<Record, ValidationErrors>> {
    let schema = registry.require(schema_name)?;
    let record = data
        .as_object()
        .ok_or_else(|| CliError::io_error("Input must be a JSON object"))?;

    Ok(SchemaValidator::new(&schema).validate(record))
}

/// Print registered schema names
pub fn schemas(schema_dir: Option<&Path>) -> CliResult<()> {
    let registry = build_registry(schema_dir)?;
    write_response(json!(registry.names()))
}
