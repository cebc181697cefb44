//! Record validation against a schema
//!
//! Validation semantics:
//! - Fields are checked in schema declaration order
//! - A required field that is absent, null or "" reports "<field> is required"
//!   and nothing else
//! - An optional field that is absent, null or "" is skipped and omitted
//! - Type and constraint checks accumulate; every violation is reported
//! - Constraint checks run by declared type even when the type check failed
//! - Undeclared fields never reach the sanitized record
//! - Values are copied raw; nothing is coerced, trimmed or defaulted
//!
//! The validator is a pure function of its inputs and never fails for user
//! data. Configuration problems (bad regexes) surface when rules are built.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::trace;

use super::coerce::{display_text, integral_text, is_blank, length_of, number_of};
use super::errors::ValidationErrors;
use super::types::{ArrayRule, FieldKind, FieldRule, NumberRule, Record, Schema, StringRule};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// Validates records against a single schema.
///
/// Holds no state beyond the borrowed schema; safe to share across threads.
pub struct SchemaValidator<'a> {
    schema: &'a Schema,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Validates a record.
    ///
    /// Returns the sanitized record (declared fields only, raw values) or the
    /// accumulated field errors. On failure no partial record is returned;
    /// the caller still owns its original input.
    pub fn validate(&self, data: &Record) -> Result<Record, ValidationErrors> {
        let mut errors = Vec::new();
        let mut sanitized = Record::new();

        for (field, rule) in self.schema.fields() {
            let value = data.get(field);

            if is_blank(value) {
                if rule.required {
                    errors.push(format!("{} is required", field));
                }
                continue;
            }
            let Some(value) = value else { continue };

            check_field(field, rule, value, data, &mut errors);
            sanitized.insert(field.to_string(), value.clone());
        }

        if errors.is_empty() {
            trace!(fields = sanitized.len(), "record accepted");
            Ok(sanitized)
        } else {
            trace!(errors = errors.len(), "record rejected");
            Err(ValidationErrors::new(errors))
        }
    }

    /// Validates an arbitrary JSON value; non-objects behave as an empty record.
    pub fn validate_value(&self, data: &Value) -> Result<Record, ValidationErrors> {
        match data {
            Value::Object(record) => self.validate(record),
            _ => self.validate(&Record::new()),
        }
    }
}

/// Validates `data` against `schema`.
pub fn validate(data: &Record, schema: &Schema) -> Result<Record, ValidationErrors> {
    SchemaValidator::new(schema).validate(data)
}

fn check_field(field: &str, rule: &FieldRule, value: &Value, data: &Record, errors: &mut Vec<String>) {
    if let Some(type_name) = rule.kind.type_name() {
        if !matches_type(&rule.kind, value) {
            errors.push(format!("{} must be a {}", field, type_name));
        }
    }

    match &rule.kind {
        FieldKind::String(string_rule) => check_string(field, string_rule, value, errors),
        FieldKind::Number(number_rule) => check_number(field, number_rule, value, errors),
        FieldKind::Array(array_rule) => check_array(field, array_rule, value, errors),
        FieldKind::Any | FieldKind::Boolean | FieldKind::Object => {}
    }

    if let Some(custom) = rule.validator() {
        if let Some(message) = custom(value, data) {
            if !message.is_empty() {
                errors.push(message);
            }
        }
    }
}

fn matches_type(kind: &FieldKind, value: &Value) -> bool {
    match kind {
        FieldKind::Any => true,
        FieldKind::String(_) => value.is_string(),
        FieldKind::Number(_) => value.is_number() || number_of(value).is_some(),
        FieldKind::Boolean => {
            value.is_boolean() || matches!(value.as_str(), Some("true") | Some("false"))
        }
        FieldKind::Array(_) => value.is_array(),
        FieldKind::Object => value.is_object(),
    }
}

/// Length rules apply to values with a length (strings, arrays). Pattern
/// and email rules test the textual reading of any value, so `["ab"]` is
/// matched as `ab` and an object as `[object Object]`.
fn check_string(field: &str, rule: &StringRule, value: &Value, errors: &mut Vec<String>) {
    let length = length_of(value);

    if let (Some(min), Some(len)) = (rule.min_length, length) {
        if len < min {
            errors.push(format!("{} must be at least {} characters long", field, min));
        }
    }
    if let (Some(max), Some(len)) = (rule.max_length, length) {
        if len > max {
            errors.push(format!("{} must be at most {} characters long", field, max));
        }
    }

    let text = display_text(value);
    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(&text) {
            errors.push(format!("{} has an invalid format", field));
        }
    }
    if rule.is_email && !EMAIL_REGEX.is_match(&text) {
        errors.push(format!("{} must be a valid email address", field));
    }
}

fn check_number(field: &str, rule: &NumberRule, value: &Value, errors: &mut Vec<String>) {
    // Bounds compare the numeric reading of the raw value; a value with no
    // numeric reading never violates a bound.
    let Some(n) = number_of(value) else { return };

    if let Some(min) = rule.min {
        if n < min {
            errors.push(format!("{} must be at least {}", field, format_bound(min)));
        }
    }
    if let Some(max) = rule.max {
        if n > max {
            errors.push(format!("{} must be at most {}", field, format_bound(max)));
        }
    }
}

fn check_array(field: &str, rule: &ArrayRule, value: &Value, errors: &mut Vec<String>) {
    let length = length_of(value);

    if let (Some(min), Some(len)) = (rule.min_items, length) {
        if len < min {
            errors.push(format!("{} must have at least {} items", field, min));
        }
    }
    if let (Some(max), Some(len)) = (rule.max_items, length) {
        if len > max {
            errors.push(format!("{} must have at most {} items", field, max));
        }
    }

    let (Some(items_schema), Some(items)) = (&rule.items, value.as_array()) else {
        return;
    };
    let validator = SchemaValidator::new(items_schema);
    for (index, item) in items.iter().enumerate() {
        if let Err(nested) = validator.validate_value(item) {
            errors.push(format!("{}[{}]: {}", field, index, nested));
        }
    }
}

/// Renders bounds the way they are written in schemas: `0`, not `0.0`.
fn format_bound(n: f64) -> String {
    integral_text(n).unwrap_or_else(|| n.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{ArrayRule, NumberRule, StringRule};
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn user_schema() -> Schema {
        Schema::new()
            .field("name", FieldRule::required(StringRule::new().min_length(2)))
            .field("email", FieldRule::required(StringRule::new().email()))
            .field("age", FieldRule::optional(NumberRule::new().min(0.0).max(150.0)))
            .field("active", FieldRule::optional_boolean())
    }

    #[test]
    fn test_valid_record_passes() {
        let data = record(json!({
            "name": "Alice",
            "email": "alice@example.com",
            "age": 30,
            "active": true
        }));

        let sanitized = validate(&data, &user_schema()).unwrap();
        assert_eq!(sanitized, data);
    }

    #[test]
    fn test_undeclared_fields_dropped() {
        let schema = Schema::new().field("a", FieldRule::optional_string());
        let data = record(json!({"a": "x", "b": "y"}));

        let sanitized = validate(&data, &schema).unwrap();
        assert_eq!(Value::Object(sanitized), json!({"a": "x"}));
    }

    #[test]
    fn test_missing_required_reports_only_required() {
        let data = record(json!({"email": "alice@example.com"}));

        let errors = validate(&data, &user_schema()).unwrap_err();
        assert_eq!(errors.messages(), ["name is required"]);
    }

    #[test]
    fn test_empty_string_and_null_count_as_missing() {
        let data = record(json!({"name": "", "email": null}));

        let errors = validate(&data, &user_schema()).unwrap_err();
        assert_eq!(errors.messages(), ["name is required", "email is required"]);
    }

    #[test]
    fn test_optional_blank_fields_omitted() {
        let data = record(json!({
            "name": "Alice",
            "email": "alice@example.com",
            "age": "",
            "active": null
        }));

        let sanitized = validate(&data, &user_schema()).unwrap();
        assert!(!sanitized.contains_key("age"));
        assert!(!sanitized.contains_key("active"));
    }

    #[test]
    fn test_type_mismatch_messages() {
        let schema = Schema::new()
            .field("s", FieldRule::optional_string())
            .field("n", FieldRule::optional_number())
            .field("b", FieldRule::optional_boolean())
            .field("a", FieldRule::optional(ArrayRule::new()))
            .field("o", FieldRule::optional(FieldKind::Object));
        let data = record(json!({
            "s": 1,
            "n": "abc",
            "b": "yes",
            "a": {"k": 1},
            "o": [1]
        }));

        let errors = validate(&data, &schema).unwrap_err();
        assert_eq!(
            errors.messages(),
            [
                "s must be a string",
                "n must be a number",
                "b must be a boolean",
                "a must be a array",
                "o must be a object",
            ]
        );
    }

    #[test]
    fn test_lenient_number_and_boolean_text() {
        let schema = Schema::new()
            .field("n", FieldRule::required_number())
            .field("b", FieldRule::required(FieldKind::Boolean));
        let data = record(json!({"n": "12", "b": "false"}));

        let sanitized = validate(&data, &schema).unwrap();
        assert_eq!(sanitized["n"], json!("12"));
        assert_eq!(sanitized["b"], json!("false"));
    }

    #[test]
    fn test_untyped_field_accepts_anything() {
        let schema = Schema::new().field("meta", FieldRule::required(FieldKind::Any));
        let data = record(json!({"meta": {"nested": [1, 2]}}));

        assert!(validate(&data, &schema).is_ok());
    }

    #[test]
    fn test_multiple_string_violations_reported() {
        let schema = Schema::new().field(
            "code",
            FieldRule::required(StringRule::new().min_length(5).pattern("^[0-9]+$").unwrap()),
        );
        let data = record(json!({"code": "ab"}));

        let errors = validate(&data, &schema).unwrap_err();
        assert_eq!(
            errors.to_string(),
            "code must be at least 5 characters long. code has an invalid format"
        );
    }

    #[test]
    fn test_max_length() {
        let schema =
            Schema::new().field("name", FieldRule::required(StringRule::new().max_length(3)));
        let errors = validate(&record(json!({"name": "abcd"})), &schema).unwrap_err();
        assert_eq!(errors.messages(), ["name must be at most 3 characters long"]);
    }

    #[test]
    fn test_constraints_run_after_type_failure() {
        let schema = Schema::new().field(
            "tags",
            FieldRule::required(StringRule::new().min_length(3)),
        );
        let data = record(json!({"tags": ["a"]}));

        let errors = validate(&data, &schema).unwrap_err();
        assert_eq!(
            errors.messages(),
            ["tags must be a string", "tags must be at least 3 characters long"]
        );
    }

    #[test]
    fn test_email_check() {
        let errors = validate(
            &record(json!({"name": "Al", "email": "not-an-email"})),
            &user_schema(),
        )
        .unwrap_err();
        assert_eq!(errors.messages(), ["email must be a valid email address"]);

        let errors = validate(
            &record(json!({"name": "Al", "email": "a b@x.com"})),
            &user_schema(),
        )
        .unwrap_err();
        assert!(errors.contains("valid email"));
    }

    #[test]
    fn test_number_bounds() {
        let data = record(json!({"name": "Al", "email": "a@b.co", "age": -1}));
        let errors = validate(&data, &user_schema()).unwrap_err();
        assert_eq!(errors.messages(), ["age must be at least 0"]);

        let data = record(json!({"name": "Al", "email": "a@b.co", "age": 151}));
        let errors = validate(&data, &user_schema()).unwrap_err();
        assert_eq!(errors.messages(), ["age must be at most 150"]);
    }

    #[test]
    fn test_number_bounds_read_numeric_text() {
        let schema = Schema::new().field("qty", FieldRule::required(NumberRule::new().min(10.0)));

        let errors = validate(&record(json!({"qty": "9"})), &schema).unwrap_err();
        assert_eq!(errors.messages(), ["qty must be at least 10"]);

        let sanitized = validate(&record(json!({"qty": "10"})), &schema).unwrap();
        assert_eq!(sanitized["qty"], json!("10"));
    }

    #[test]
    fn test_fractional_bound_formatting() {
        let schema = Schema::new().field("rate", FieldRule::required(NumberRule::new().max(0.5)));
        let errors = validate(&record(json!({"rate": 0.75})), &schema).unwrap_err();
        assert_eq!(errors.messages(), ["rate must be at most 0.5"]);
    }

    #[test]
    fn test_large_bound_formatting() {
        let schema = Schema::new().field("n", FieldRule::required(NumberRule::new().max(1e20)));
        let errors = validate(&record(json!({"n": 1e21})), &schema).unwrap_err();
        assert_eq!(errors.messages(), ["n must be at most 100000000000000000000"]);
    }

    #[test]
    fn test_pattern_reads_large_numbers_in_full() {
        let schema = Schema::new().field(
            "n",
            FieldRule::required(StringRule::new().pattern("^1000").unwrap()),
        );
        let errors = validate(&record(json!({"n": 1e20})), &schema).unwrap_err();
        assert_eq!(errors.messages(), ["n must be a string"]);
    }

    #[test]
    fn test_pattern_and_email_read_arrays_and_objects_as_text() {
        let schema = Schema::new()
            .field("code", FieldRule::required(StringRule::new().pattern("^[0-9]+$").unwrap()))
            .field("email", FieldRule::optional(StringRule::new().email()));

        let errors = validate(&record(json!({"code": ["ab"]})), &schema).unwrap_err();
        assert_eq!(errors.messages(), ["code must be a string", "code has an invalid format"]);

        let errors = validate(&record(json!({"code": ["12"]})), &schema).unwrap_err();
        assert_eq!(errors.messages(), ["code must be a string"]);

        let errors =
            validate(&record(json!({"code": "1", "email": {"a": 1}})), &schema).unwrap_err();
        assert_eq!(
            errors.messages(),
            ["email must be a string", "email must be a valid email address"]
        );
    }

    #[test]
    fn test_array_item_count() {
        let schema = Schema::new().field(
            "tags",
            FieldRule::required(ArrayRule::new().min_items(2).max_items(3)),
        );

        let errors = validate(&record(json!({"tags": ["a"]})), &schema).unwrap_err();
        assert_eq!(errors.messages(), ["tags must have at least 2 items"]);

        let errors = validate(&record(json!({"tags": [1, 2, 3, 4]})), &schema).unwrap_err();
        assert_eq!(errors.messages(), ["tags must have at most 3 items"]);
    }

    #[test]
    fn test_nested_item_errors() {
        let items = Schema::new().field("qty", FieldRule::required_number());
        let schema = Schema::new().field("items", FieldRule::optional(ArrayRule::new().items(items)));
        let data = record(json!({"items": [{"qty": 1}, {}]}));

        let errors = validate(&data, &schema).unwrap_err();
        assert_eq!(errors.messages(), ["items[1]: qty is required"]);
    }

    #[test]
    fn test_nested_errors_are_joined() {
        let items = Schema::new()
            .field("sku", FieldRule::required_string())
            .field("qty", FieldRule::required_number());
        let schema = Schema::new().field("items", FieldRule::required(ArrayRule::new().items(items)));
        let data = record(json!({"items": [5]}));

        let errors = validate(&data, &schema).unwrap_err();
        assert_eq!(errors.messages(), ["items[0]: sku is required. qty is required"]);
    }

    #[test]
    fn test_sanitized_array_keeps_raw_items() {
        let items = Schema::new().field("qty", FieldRule::required_number());
        let schema = Schema::new().field("items", FieldRule::required(ArrayRule::new().items(items)));
        let data = record(json!({"items": [{"qty": 1, "note": "keep"}]}));

        let sanitized = validate(&data, &schema).unwrap();
        assert_eq!(sanitized["items"], json!([{"qty": 1, "note": "keep"}]));
    }

    #[test]
    fn test_custom_validator_sees_record() {
        let schema = Schema::new()
            .field("password", FieldRule::required_string())
            .field(
                "confirm",
                FieldRule::required_string().with_validator(|value, data| {
                    (Some(value) != data.get("password")).then(|| "passwords do not match".to_string())
                }),
            );

        let errors =
            validate(&record(json!({"password": "abc", "confirm": "abd"})), &schema).unwrap_err();
        assert_eq!(errors.messages(), ["passwords do not match"]);

        assert!(validate(&record(json!({"password": "abc", "confirm": "abc"})), &schema).is_ok());
    }

    #[test]
    fn test_custom_validator_empty_message_ignored() {
        let schema =
            Schema::new().field("x", FieldRule::required_string().with_validator(|_, _| Some(String::new())));
        assert!(validate(&record(json!({"x": "y"})), &schema).is_ok());
    }

    #[test]
    fn test_custom_validator_runs_after_builtin_checks() {
        let schema = Schema::new().field(
            "code",
            FieldRule::required(StringRule::new().min_length(3))
                .with_validator(|_, _| Some("code is reserved".to_string())),
        );

        let errors = validate(&record(json!({"code": "a"})), &schema).unwrap_err();
        assert_eq!(
            errors.messages(),
            ["code must be at least 3 characters long", "code is reserved"]
        );
    }

    #[test]
    fn test_errors_follow_declaration_order() {
        let schema = Schema::new()
            .field("z", FieldRule::required_string())
            .field("a", FieldRule::required_string())
            .field("m", FieldRule::required_string());

        let errors = validate(&Record::new(), &schema).unwrap_err();
        assert_eq!(errors.to_string(), "z is required. a is required. m is required");
    }

    #[test]
    fn test_revalidation_is_fixed_point() {
        let data = record(json!({
            "name": "Alice",
            "email": "alice@example.com",
            "extra": 1
        }));

        let once = validate(&data, &user_schema()).unwrap();
        let twice = validate(&once, &user_schema()).unwrap();
        assert_eq!(once, twice);
    }
}
