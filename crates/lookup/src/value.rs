//! Helpers for describing dynamically typed field values in error messages.

use serde_json::Value;

/// Name of the runtime type of `value`, as reported to clients in
/// `incorrect_type*` messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Render `value` for interpolation into a message template. Strings are
/// inserted without their JSON quotes.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
