//! Schema error types
//!
//! Two families:
//! - `SchemaError`: configuration problems found while building or loading
//!   schemas, or lookups of schemas that do not exist.
//! - `ValidationErrors`: the accumulated per-field messages produced when a
//!   record is rejected. These are user-facing and always recoverable.
//!
//! Error codes:
//! - MC_SCHEMA_INVALID_PATTERN (FATAL)
//! - MC_SCHEMA_UNKNOWN_TYPE (FATAL)
//! - MC_SCHEMA_MALFORMED (FATAL)
//! - MC_SCHEMA_DUPLICATE (FATAL)
//! - MC_SCHEMA_UNKNOWN (REJECT)
//! - MC_VALIDATION_FAILED (REJECT)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller request rejected
    Reject,
    /// Deployment misconfiguration; the process must not start
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// `pattern` is not a valid regex
    InvalidPattern,
    /// Schema file names a type outside string/number/boolean/array/object
    UnknownType,
    /// Schema file unreadable or not valid JSON
    Malformed,
    /// Two schemas registered under one name
    Duplicate,
    /// No schema registered under the requested name
    UnknownSchema,
}

impl SchemaErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::InvalidPattern => "MC_SCHEMA_INVALID_PATTERN",
            SchemaErrorCode::UnknownType => "MC_SCHEMA_UNKNOWN_TYPE",
            SchemaErrorCode::Malformed => "MC_SCHEMA_MALFORMED",
            SchemaErrorCode::Duplicate => "MC_SCHEMA_DUPLICATE",
            SchemaErrorCode::UnknownSchema => "MC_SCHEMA_UNKNOWN",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::UnknownSchema => Severity::Reject,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema configuration or lookup error
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    /// Schema name if known
    schema_name: Option<String>,
}

impl SchemaError {
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::InvalidPattern,
            message: format!("Invalid pattern '{}': {}", pattern.into(), reason.into()),
            schema_name: None,
        }
    }

    /// The message is the same text the validator historically reported for
    /// an undeclared type name.
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::UnknownType,
            message: format!("Unknown type: {}", type_name.into()),
            schema_name: None,
        }
    }

    pub fn malformed_schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::Malformed,
            message: format!("Malformed schema file '{}': {}", path.into(), reason.into()),
            schema_name: None,
        }
    }

    pub fn duplicate(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: SchemaErrorCode::Duplicate,
            message: format!("Schema '{}' is already registered", name),
            schema_name: Some(name),
        }
    }

    pub fn duplicate_field(field: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::Duplicate,
            message: format!("Field '{}' is declared more than once", field.into()),
            schema_name: None,
        }
    }

    pub fn unknown_schema(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: SchemaErrorCode::UnknownSchema,
            message: format!("Schema '{}' not found", name),
            schema_name: Some(name),
        }
    }

    /// Attach the schema name to an error raised while building that schema.
    pub fn in_schema(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.message = format!("{} (in schema '{}')", self.message, name);
        self.schema_name = Some(name);
        self
    }

    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Field errors accumulated while validating one record.
///
/// Messages are kept in schema declaration order. The display form joins
/// them with `". "`, which is the text returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    pub const CODE: &'static str = "MC_VALIDATION_FAILED";

    pub(crate) fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True if any message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.contains(needle))
    }

    /// The `". "`-joined message
    pub fn joined(&self) -> String {
        self.messages.join(". ")
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

impl std::error::Error for ValidationErrors {}
