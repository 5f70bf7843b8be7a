// Loosely-typed field values

use serde::Serialize;
use std::fmt;

/// The value found at a field path.
///
/// Rules gate on the variant: a rule that expects one kind treats every
/// other kind as "does not apply".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No such field, or an empty `Option` on the way to it
    Null,
    Bool(bool),
    /// Any primitive integer up to 64 bits, signed or not
    Int(i128),
    Float(f64),
    String(String),
    /// Any other representable type, carried by name only
    Other(&'static str),
}

impl FieldValue {
    /// Short name of the value's kind, as used in fault messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::String(_) => "string",
            FieldValue::Other(name) => name,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(n) => write!(f, "{}", n),
            FieldValue::Float(n) => write!(f, "{}", n),
            FieldValue::String(s) => f.write_str(s),
            FieldValue::Other(name) => write!(f, "<{}>", name),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(i128::from(value))
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(i128::from(value))
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Int(i128::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(FieldValue::Null.kind(), "null");
        assert_eq!(FieldValue::from(3).kind(), "integer");
        assert_eq!(FieldValue::from(1.5).kind(), "float");
        assert_eq!(FieldValue::from("x").kind(), "string");
        assert_eq!(FieldValue::Other("Vec").kind(), "Vec");
    }

    #[test]
    fn test_accessors_match_only_their_kind() {
        let value = FieldValue::from(42i64);
        assert_eq!(value.as_int(), Some(42));
        assert_eq!(value.as_float(), None);
        assert_eq!(value.as_str(), None);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(FieldValue::from(None::<i64>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some("a")), FieldValue::String("a".into()));
    }

    #[test]
    fn test_serializes_untagged() {
        let json = serde_json::to_value(FieldValue::from("john")).unwrap();
        assert_eq!(json, serde_json::json!("john"));
        let json = serde_json::to_value(FieldValue::Null).unwrap();
        assert!(json.is_null());
    }
}
