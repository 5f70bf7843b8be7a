// Validation errors and access faults

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// One failed rule, tagged with the field path that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Dotted path of the field that failed validation
    pub field: String,

    /// Field-prefixed message, e.g. `"age must be at least 18"`
    pub message: String,

    /// Rule that failed
    pub constraint: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            constraint: "custom".to_string(),
        }
    }

    /// Set the constraint name
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = constraint.into();
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Ordered collection of validation errors
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Get errors for a specific field path, in the order they were reported
    pub fn get_field_errors(&self, field: &str) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": self.errors.iter().map(|e| {
                serde_json::json!({
                    "field": e.field,
                    "message": e.message,
                    "constraint": e.constraint,
                })
            }).collect::<Vec<_>>()
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::new(errors)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// A leaf refused a value during write-back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    /// What the leaf can hold
    pub expected: &'static str,
    /// What it was given
    pub found: String,
}

impl TypeMismatch {
    pub fn new(expected: &'static str, found: impl Into<String>) -> Self {
        Self {
            expected,
            found: found.into(),
        }
    }
}

/// Write-back fault: the path/record contract was broken by the caller.
///
/// Reads never produce these; a missing field reads as
/// [`FieldValue::Null`](crate::FieldValue::Null).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("field path is empty")]
    EmptyPath,

    #[error("{path}: no field named `{segment}`")]
    UnknownField { path: String, segment: String },

    #[error("{path}: `{segment}` is not a record")]
    NotARecord { path: String, segment: String },

    #[error("{path}: `{segment}` is empty")]
    NullIndirection { path: String, segment: String },

    #[error("{path}: record is read-only")]
    ReadOnly { path: String },

    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },
}

impl AccessError {
    pub(crate) fn mismatch(path: &str, mismatch: TypeMismatch) -> Self {
        AccessError::TypeMismatch {
            path: path.to_string(),
            expected: mismatch.expected,
            found: mismatch.found,
        }
    }
}
