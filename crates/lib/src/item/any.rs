//! The lib0 "any" value carried by `Any`, `Embed`, `Format` and `Json` contents.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// A dynamically typed value as encoded by lib0's `writeAny`.
///
/// Maps keep keys in insertion order, matching `JSON.stringify` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Any {
    Undefined,
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    BigInt(i64),
    String(String),
    Buffer(Vec<u8>),
    Array(Vec<Any>),
    Map(IndexMap<String, Any>),
}

impl Any {
    /// Returns true for `null` and `undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Any::Null | Any::Undefined)
    }
}

impl From<serde_json::Value> for Any {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Any::Null,
            Value::Bool(b) => Any::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Any::Integer(i),
                None => Any::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Any::String(s),
            Value::Array(values) => Any::Array(values.into_iter().map(Any::from).collect()),
            Value::Object(entries) => {
                Any::Map(entries.into_iter().map(|(k, v)| (k, Any::from(v))).collect())
            }
        }
    }
}

/// Formats a float the way JavaScript's `Number.prototype.toString` does for
/// the common cases: integral values drop the fractional part.
fn fmt_js_number(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        write!(f, "NaN")
    } else if value.is_infinite() {
        write!(f, "{}", if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        write!(f, "{}", value as i64)
    } else {
        write!(f, "{value}")
    }
}

/// String coercion with JavaScript semantics (`"" + value`).
impl fmt::Display for Any {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Any::Undefined => write!(f, "undefined"),
            Any::Null => write!(f, "null"),
            Any::Bool(b) => write!(f, "{b}"),
            Any::Integer(i) | Any::BigInt(i) => write!(f, "{i}"),
            Any::Float(v) => fmt_js_number(f, *v),
            Any::String(s) => write!(f, "{s}"),
            Any::Buffer(bytes) => {
                let parts: Vec<String> = bytes.iter().map(|b| b.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
            Any::Array(values) => {
                // Nested null/undefined become empty strings in Array.prototype.join
                let parts: Vec<String> = values
                    .iter()
                    .map(|v| if v.is_nullish() { String::new() } else { v.to_string() })
                    .collect();
                write!(f, "{}", parts.join(","))
            }
            Any::Map(_) => write!(f, "[object Object]"),
        }
    }
}
