//! Lenient readings of JSON values used by the type and constraint checks.
//!
//! Request data arrives from query strings and path templates as text, so a
//! `number` field must accept `"42"` and a `boolean` field `"true"`. These
//! helpers define what counts as the numeric, textual and length reading of
//! a value. None of them change the value that ends up in the sanitized
//! record.

use serde_json::Value;

/// Numeric reading of a value, `None` where the reading would be NaN.
///
/// - numbers as-is
/// - booleans as 1 / 0
/// - strings after trimming whitespace: empty is 0, decimal literals,
///   `0x`/`0o`/`0b` integer literals, signed `Infinity`
/// - arrays of zero elements are 0, single-element arrays read their element
pub fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        Value::Array(items) => match items.as_slice() {
            [] => Some(0.0),
            [only] => match only {
                Value::Bool(_) | Value::Object(_) => None,
                other => number_of(other),
            },
            _ => None,
        },
        Value::Object(_) => None,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let t = s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if t.is_empty() {
        return Some(0.0);
    }

    match t {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match t.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &t[2..];
        if digits.is_empty() {
            return None;
        }
        return digits
            .chars()
            .try_fold(0f64, |acc, c| c.to_digit(radix).map(|d| acc * radix as f64 + d as f64));
    }

    // f64's parser also accepts "inf" and "nan"; only plain decimal literals count.
    if !t
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    t.parse::<f64>().ok()
}

/// Textual reading of scalar values, `None` for null, arrays and objects.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(
            n.as_f64()
                .filter(|_| n.is_f64())
                .and_then(integral_text)
                .unwrap_or_else(|| n.to_string()),
        ),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Textual reading of any value as a string check sees it.
///
/// Arrays join their elements with `,` (null elements read as empty),
/// objects read as `[object Object]`.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
        scalar => text_of(scalar).unwrap_or_default(),
    }
}

/// Whole numbers below 1e21 written out in full, without a fraction.
///
/// Larger magnitudes and fractional values return `None`.
pub fn integral_text(f: f64) -> Option<String> {
    if f.fract() != 0.0 || f.abs() >= 1e21 {
        return None;
    }
    // `{:.0}` keeps the sign of -0.0
    Some(if f == 0.0 { "0".to_string() } else { format!("{:.0}", f) })
}

/// Length of strings (UTF-16 code units) and arrays; `None` otherwise.
pub fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.encode_utf16().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Present means not absent, not null, and not the empty string.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}
