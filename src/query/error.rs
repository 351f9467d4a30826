//! Query error types
//!
//! Defines the error conditions that can occur while building, exporting or
//! loading a query.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during query operations
#[derive(Error, Debug)]
pub enum QueryError {
    /// A value did not have the type its attribute requires
    #[error("{attribute} ({value}) must be {expected}, got {found} instead")]
    TypeValidation {
        /// Document key of the attribute being set
        attribute: &'static str,
        /// The rejected value
        value: Value,
        /// Expected type name
        expected: &'static str,
        /// Actual type name of `value`
        found: &'static str,
    },

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QueryError {
    /// Build a type validation error for `value`
    pub(crate) fn type_mismatch(attribute: &'static str, value: &Value, expected: &'static str) -> Self {
        Self::TypeValidation {
            attribute,
            value: value.clone(),
            expected,
            found: json_type_name(value),
        }
    }
}

/// Human-readable name of a JSON value's type
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_validation_display() {
        let err = QueryError::type_mismatch("columns", &json!(42), "string");
        assert_eq!(err.to_string(), "columns (42) must be string, got integer instead");
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(true)), "bool");
        assert_eq!(json_type_name(&json!(1.5)), "float");
        assert_eq!(json_type_name(&json!(-3)), "integer");
        assert_eq!(json_type_name(&json!("x")), "string");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }

    #[test]
    fn test_serde_error_conversion() {
        let serde_err = serde_json::from_str::<Value>("{not json").unwrap_err();
        let err: QueryError = serde_err.into();
        assert!(matches!(err, QueryError::Serialization(_)));
    }
}
