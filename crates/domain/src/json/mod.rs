//! Typed JSON traversal and comparison
//!
//! The harness never reaches into decoded documents with runtime type
//! inspection; everything goes through the explicit path evaluator and
//! structural comparison defined here.

pub mod compare;
pub mod path;

use serde_json::Value;

pub use compare::json_eq;
pub use path::{PathError, evaluate};

/// Returns the JSON kind of a value as a display name.
#[must_use]
pub const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
