//! Schema type definitions
//!
//! A schema is an ordered list of named field rules. Each rule carries a
//! required flag, a rule kind with the constraints that kind understands,
//! and an optional custom validator.
//!
//! Supported kinds:
//! - string: length bounds, regex pattern, email shape
//! - number: inclusive min/max bounds
//! - boolean
//! - array: item count bounds and an optional item schema
//! - object
//! - any: no declared type, only required-ness and custom checks

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};

/// A plain key-value record as decoded from a body, query string or path.
pub type Record = Map<String, Value>;

/// Caller-supplied business rule. Receives the field value and the record
/// being validated; returns an error message when the value is rejected.
pub type CustomValidator = Arc<dyn Fn(&Value, &Record) -> Option<String> + Send + Sync>;

/// Constraints for string fields
#[derive(Debug, Clone, Default)]
pub struct StringRule {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub is_email: bool,
}

impl StringRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn email(mut self) -> Self {
        self.is_email = true;
        self
    }

    /// Attach a regex pattern.
    ///
    /// # Errors
    ///
    /// An invalid regex is a configuration error (MC_SCHEMA_INVALID_PATTERN).
    pub fn pattern(mut self, pattern: &str) -> SchemaResult<Self> {
        let regex =
            Regex::new(pattern).map_err(|e| SchemaError::invalid_pattern(pattern, e.to_string()))?;
        self.pattern = Some(regex);
        Ok(self)
    }
}

/// Constraints for number fields (inclusive bounds)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberRule {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumberRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, n: f64) -> Self {
        self.min = Some(n);
        self
    }

    pub fn max(mut self, n: f64) -> Self {
        self.max = Some(n);
        self
    }
}

/// Constraints for array fields
#[derive(Debug, Clone, Default)]
pub struct ArrayRule {
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    /// Schema applied to every element of a non-empty array
    pub items: Option<Schema>,
}

impl ArrayRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    pub fn items(mut self, schema: Schema) -> Self {
        self.items = Some(schema);
        self
    }
}

/// Declared shape of a field, with the constraints valid for that shape
#[derive(Debug, Clone, Default)]
pub enum FieldKind {
    /// No declared type
    #[default]
    Any,
    String(StringRule),
    Number(NumberRule),
    Boolean,
    Array(ArrayRule),
    Object,
}

impl FieldKind {
    /// Returns the type name used in error messages, `None` for `Any`
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            FieldKind::Any => None,
            FieldKind::String(_) => Some("string"),
            FieldKind::Number(_) => Some("number"),
            FieldKind::Boolean => Some("boolean"),
            FieldKind::Array(_) => Some("array"),
            FieldKind::Object => Some("object"),
        }
    }
}

impl From<StringRule> for FieldKind {
    fn from(rule: StringRule) -> Self {
        FieldKind::String(rule)
    }
}

impl From<NumberRule> for FieldKind {
    fn from(rule: NumberRule) -> Self {
        FieldKind::Number(rule)
    }
}

impl From<ArrayRule> for FieldKind {
    fn from(rule: ArrayRule) -> Self {
        FieldKind::Array(rule)
    }
}

/// Validation rule for a single field
#[derive(Clone, Default)]
pub struct FieldRule {
    /// Whether the field must be present and non-empty
    pub required: bool,
    /// Declared type and its constraints
    pub kind: FieldKind,
    validator: Option<CustomValidator>,
}

impl FieldRule {
    /// Create a required field of the given kind
    pub fn required(kind: impl Into<FieldKind>) -> Self {
        Self {
            required: true,
            kind: kind.into(),
            validator: None,
        }
    }

    /// Create an optional field of the given kind
    pub fn optional(kind: impl Into<FieldKind>) -> Self {
        Self {
            required: false,
            kind: kind.into(),
            validator: None,
        }
    }

    /// Create a required string field with no constraints
    pub fn required_string() -> Self {
        Self::required(StringRule::new())
    }

    /// Create an optional string field with no constraints
    pub fn optional_string() -> Self {
        Self::optional(StringRule::new())
    }

    /// Create a required number field with no bounds
    pub fn required_number() -> Self {
        Self::required(NumberRule::new())
    }

    /// Create an optional number field with no bounds
    pub fn optional_number() -> Self {
        Self::optional(NumberRule::new())
    }

    pub fn optional_boolean() -> Self {
        Self::optional(FieldKind::Boolean)
    }

    /// Attach a custom validator, run after the built-in checks
    pub fn with_validator<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Record) -> Option<String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(f));
        self
    }

    pub fn validator(&self) -> Option<&CustomValidator> {
        self.validator.as_ref()
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("required", &self.required)
            .field("kind", &self.kind)
            .field("validator", &self.validator.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Ordered mapping of field name to rule.
///
/// Declaration order determines the order of reported errors.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, FieldRule)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Redeclaring a name replaces its rule in place.
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = rule,
            None => self.fields.push((name, rule)),
        }
        self
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
