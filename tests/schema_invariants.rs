//! Schema Invariant Tests
//!
//! Properties every schema and record must satisfy:
//! - Valid records come back with exactly the declared fields, values untouched
//! - Missing required fields report only "is required"
//! - Optional blank fields are silent and omitted
//! - Undeclared fields never appear in the output
//! - Validation is deterministic and a fixed point on its own output

use marketconnect::schema::{
    validate, ArrayRule, FieldKind, FieldRule, NumberRule, Record, Schema, SchemaRegistry,
    StringRule,
};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn record(value: Value) -> Record {
    value.as_object().cloned().expect("test record must be an object")
}

fn order_schema() -> Schema {
    let line = Schema::new()
        .field("product_id", FieldRule::required(NumberRule::new().min(1.0)))
        .field("qty", FieldRule::required(NumberRule::new().min(1.0)));

    Schema::new()
        .field("reference", FieldRule::required(StringRule::new().min_length(4)))
        .field("items", FieldRule::required(ArrayRule::new().min_items(1).items(line)))
        .field("gift", FieldRule::optional_boolean())
        .field("meta", FieldRule::optional(FieldKind::Object))
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// Same record validates the same way every time.
#[test]
fn test_validation_is_deterministic() {
    let schema = order_schema();
    let data = record(json!({"reference": "ab", "items": [{"qty": 0}]}));

    let first = validate(&data, &schema).unwrap_err();
    for _ in 0..100 {
        assert_eq!(validate(&data, &schema).unwrap_err(), first);
    }
}

// =============================================================================
// Sanitization Tests
// =============================================================================

/// Valid records keep declared fields with their original values.
#[test]
fn test_valid_record_keeps_declared_fields() {
    let data = record(json!({
        "reference": "ORD-1",
        "items": [{"product_id": 3, "qty": "2"}],
        "gift": "true",
        "meta": {"source": "web"},
        "internal_flag": 1
    }));

    let sanitized = validate(&data, &order_schema()).unwrap();

    assert_eq!(
        Value::Object(sanitized),
        json!({
            "reference": "ORD-1",
            "items": [{"product_id": 3, "qty": "2"}],
            "gift": "true",
            "meta": {"source": "web"}
        })
    );
}

/// Undeclared fields are dropped.
#[test]
fn test_undeclared_field_dropped() {
    let schema = Schema::new().field("a", FieldRule::optional_string());
    let sanitized = validate(&record(json!({"a": "x", "b": "y"})), &schema).unwrap();
    assert_eq!(Value::Object(sanitized), json!({"a": "x"}));
}

/// Validating a sanitized record again yields the same record.
#[test]
fn test_sanitized_record_is_fixed_point() {
    let registry = SchemaRegistry::builtin().unwrap();
    let schema = registry.require("productCreate").unwrap();
    let data = record(json!({
        "name": "Teapot",
        "price": "19.99",
        "stock_quantity": 4,
        "category": "kitchen",
        "is_active": false,
        "vendor_id": 99
    }));

    let once = validate(&data, &schema).unwrap();
    let twice = validate(&once, &schema).unwrap();
    assert_eq!(once, twice);
    assert!(!once.contains_key("vendor_id"));
}

// =============================================================================
// Required Field Tests
// =============================================================================

/// An absent required field reports only that it is required.
#[test]
fn test_missing_required_field_skips_other_checks() {
    let schema = order_schema();
    let errors = validate(&record(json!({"items": [{"product_id": 1, "qty": 1}]})), &schema)
        .unwrap_err();

    assert_eq!(errors.messages(), ["reference is required"]);
}

/// Optional blank fields produce nothing.
#[test]
fn test_optional_blank_fields_silent() {
    let data = record(json!({
        "reference": "ORD-1",
        "items": [{"product_id": 1, "qty": 1}],
        "gift": "",
        "meta": null
    }));

    let sanitized = validate(&data, &order_schema()).unwrap();
    assert!(!sanitized.contains_key("gift"));
    assert!(!sanitized.contains_key("meta"));
}

// =============================================================================
// Error Accumulation Tests
// =============================================================================

/// All violations across all fields are reported in declaration order.
#[test]
fn test_all_violations_reported_in_order() {
    let data = record(json!({
        "reference": "ab",
        "items": [{"product_id": 1, "qty": 1}, {"qty": 0}],
        "gift": 3,
        "meta": "plain"
    }));

    let errors = validate(&data, &order_schema()).unwrap_err();
    assert_eq!(
        errors.to_string(),
        "reference must be at least 4 characters long. \
         items[1]: product_id is required. qty must be at least 1. \
         gift must be a boolean. \
         meta must be a object"
    );
}

/// Nested item errors carry the field name and index.
#[test]
fn test_nested_item_error_format() {
    let schema = Schema::new().field(
        "items",
        FieldRule::optional(ArrayRule::new().items(
            Schema::new().field("qty", FieldRule::required_number()),
        )),
    );

    let errors = validate(&record(json!({"items": [{"qty": 1}, {}]})), &schema).unwrap_err();
    assert!(errors.contains("items[1]: qty is required"));
}

/// An empty array skips item validation but still counts items.
#[test]
fn test_empty_array_checks_count_only() {
    let errors = validate(&record(json!({"reference": "ORD-1", "items": []})), &order_schema())
        .unwrap_err();
    assert_eq!(errors.messages(), ["items must have at least 1 items"]);
}

/// Several constraint failures on one field all appear.
#[test]
fn test_multiple_violations_on_one_field() {
    let schema = Schema::new().field(
        "sku",
        FieldRule::required(
            StringRule::new()
                .min_length(6)
                .pattern("^SKU-")
                .expect("valid pattern"),
        ),
    );

    let errors = validate(&record(json!({"sku": "x1"})), &schema).unwrap_err();
    assert!(errors.contains("sku must be at least 6 characters long"));
    assert!(errors.contains("sku has an invalid format"));
}

/// Type mismatch messages for each declared type.
#[test]
fn test_type_mismatch_messages() {
    let cases = [
        (FieldRule::required_string(), json!(5), "v must be a string"),
        (FieldRule::required_number(), json!("five"), "v must be a number"),
        (FieldRule::required(FieldKind::Boolean), json!("no"), "v must be a boolean"),
        (FieldRule::required(ArrayRule::new()), json!("a,b"), "v must be a array"),
    ];

    for (rule, value, expected) in cases {
        let schema = Schema::new().field("v", rule);
        let errors = validate(&record(json!({ "v": value })), &schema).unwrap_err();
        assert_eq!(errors.messages()[0], expected);
    }
}
