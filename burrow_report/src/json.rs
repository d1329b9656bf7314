//! Total field extraction over loosely typed Burrow JSON
//!
//! Burrow responses are handled as plain `serde_json::Value` trees. Every
//! accessor here returns a default instead of failing, so a single missing
//! or oddly typed field never aborts a report.

use serde_json::Value;

static NULL: Value = Value::Null;

/// Read-only accessors over a JSON tree that never fail
pub trait JsonExt {
    /// Returns the value under `key`, or `null` when absent or when `self`
    /// is not an object
    fn field(&self, key: &str) -> &Value;

    /// Returns the value under `key` only if it is a JSON object, else `null`
    fn object_field(&self, key: &str) -> &Value;

    /// Renders the field as a string; numbers and booleans are stringified,
    /// anything else (including `null`) yields `default`
    fn str_or(&self, key: &str, default: &str) -> String;

    /// Reads the field as an integer; floats are truncated and numeric
    /// strings parsed, anything else yields `default`
    fn i64_or(&self, key: &str, default: i64) -> i64;

    /// Like [`JsonExt::i64_or`], but tells an absent field apart from an
    /// unreadable one: `Some(default)` when the field is absent or `null`,
    /// `None` when it holds something that is not a number
    fn checked_i64_or(&self, key: &str, default: i64) -> Option<i64>;

    /// Returns the field as a slice of values, empty when not an array
    fn array_or_empty(&self, key: &str) -> &[Value];

    /// Collects the string elements of an array field
    fn string_list(&self, key: &str) -> Vec<String>;
}

impl JsonExt for Value {
    fn field(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }

    fn object_field(&self, key: &str) -> &Value {
        match self.get(key) {
            Some(value) if value.is_object() => value,
            _ => &NULL,
        }
    }

    fn str_or(&self, key: &str, default: &str) -> String {
        scalar_to_string(self.field(key)).unwrap_or_else(|| default.to_string())
    }

    fn i64_or(&self, key: &str, default: i64) -> i64 {
        as_integer(self.field(key)).unwrap_or(default)
    }

    fn checked_i64_or(&self, key: &str, default: i64) -> Option<i64> {
        match self.field(key) {
            Value::Null => Some(default),
            value => as_integer(value),
        }
    }

    fn array_or_empty(&self, key: &str) -> &[Value] {
        self.field(key).as_array().map(Vec::as_slice).unwrap_or(&[])
    }

    fn string_list(&self, key: &str) -> Vec<String> {
        self.array_or_empty(key)
            .iter()
            .filter_map(scalar_to_string)
            .collect()
    }
}

/// Converts a scalar JSON value to its display string
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Interprets a JSON value as an integer if it plausibly is one
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Python-style truthiness: `null`, `false`, zero, and empty
/// strings/arrays/objects are all falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
