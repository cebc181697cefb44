//! Schema validation subsystem
//!
//! Request data (JSON bodies, query strings, path parameters) is validated
//! against declarative schemas before it reaches a handler.
//!
//! # Design Principles
//!
//! - Every violation is reported in one pass, in declaration order
//! - Undeclared fields are dropped from the sanitized record
//! - Values are passed through raw; nothing is coerced or defaulted
//! - A rejected record yields errors only, never a partial record
//! - Schema misconfiguration is caught when schemas are built, not per request

mod coerce;
mod errors;
mod loader;
mod registry;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity, ValidationErrors};
pub use loader::{parse_schema, SchemaLoader};
pub use registry::*;
pub use types::{
    ArrayRule, CustomValidator, FieldKind, FieldRule, NumberRule, Record, Schema, StringRule,
};
pub use validator::{validate, SchemaValidator};
