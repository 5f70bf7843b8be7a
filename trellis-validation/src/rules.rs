// Built-in rules
//
// Every rule inspects a `FieldValue` and either passes or returns the error
// to record. Bound and pattern rules only look at the kind they understand
// and pass everything else; the type checks are what report a wrong kind.

use crate::{FieldValue, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;

// Lower-case only; callers that need case-insensitive matching lower-case first.
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,4}$").unwrap());

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static ALPHANUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

fn fail(field: &str, constraint: &str, message: String) -> Result<(), ValidationError> {
    Err(ValidationError::new(field, message).with_constraint(constraint))
}

// Type checks

/// Fails unless the value is a string
pub struct IsString;

impl IsString {
    pub fn validate(value: &FieldValue, field: &str) -> Result<(), ValidationError> {
        match value {
            FieldValue::String(_) => Ok(()),
            _ => fail(field, "isString", format!("{} must be a string", field)),
        }
    }
}

/// Fails unless the value is an integer
pub struct IsInt;

impl IsInt {
    pub fn validate(value: &FieldValue, field: &str) -> Result<(), ValidationError> {
        match value {
            FieldValue::Int(_) => Ok(()),
            _ => fail(field, "isInt", format!("{} must be an integer", field)),
        }
    }
}

/// Fails unless the value is a float
pub struct IsFloat;

impl IsFloat {
    pub fn validate(value: &FieldValue, field: &str) -> Result<(), ValidationError> {
        match value {
            FieldValue::Float(_) => Ok(()),
            _ => fail(field, "isFloat", format!("{} must be a float", field)),
        }
    }
}

// String bounds

/// Minimum string length, in bytes
pub struct MinLength(pub usize);

impl MinLength {
    pub fn validate(&self, value: &FieldValue, field: &str) -> Result<(), ValidationError> {
        match value {
            FieldValue::String(s) if s.len() < self.0 => fail(
                field,
                "minLength",
                format!("{} must be at least {} characters long", field, self.0),
            ),
            _ => Ok(()),
        }
    }
}

/// Maximum string length, in bytes
pub struct MaxLength(pub usize);

impl MaxLength {
    pub fn validate(&self, value: &FieldValue, field: &str) -> Result<(), ValidationError> {
        match value {
            FieldValue::String(s) if s.len() > self.0 => fail(
                field,
                "maxLength",
                format!("{} must be at most {} characters long", field, self.0),
            ),
            _ => Ok(()),
        }
    }
}

// Number bounds

/// Inclusive lower bound for integers
pub struct Min(pub i64);

impl Min {
    pub fn validate(&self, value: &FieldValue, field: &str) -> Result<(), ValidationError> {
        match value {
            FieldValue::Int(n) if *n < i128::from(self.0) => {
                fail(field, "min", format!("{} must be at least {}", field, self.0))
            }
            _ => Ok(()),
        }
    }
}

/// Inclusive upper bound for integers
pub struct Max(pub i64);

impl Max {
    pub fn validate(&self, value: &FieldValue, field: &str) -> Result<(), ValidationError> {
        match value {
            FieldValue::Int(n) if *n > i128::from(self.0) => {
                fail(field, "max", format!("{} must be at most {}", field, self.0))
            }
            _ => Ok(()),
        }
    }
}

/// Inclusive lower bound for floats
pub struct MinFloat(pub f64);

impl MinFloat {
    pub fn validate(&self, value: &FieldValue, field: &str) -> Result<(), ValidationError> {
        match value {
            FieldValue::Float(n) if *n < self.0 => fail(
                field,
                "minFloat",
                format!("{} must be at least {:.6}", field, self.0),
            ),
            _ => Ok(()),
        }
    }
}

/// Inclusive upper bound for floats
pub struct MaxFloat(pub f64);

impl MaxFloat {
    pub fn validate(&self, value: &FieldValue, field: &str) -> Result<(), ValidationError> {
        match value {
            FieldValue::Float(n) if *n > self.0 => fail(
                field,
                "maxFloat",
                format!("{} must be at most {:.6}", field, self.0),
            ),
            _ => Ok(()),
        }
    }
}

/// Integer or float strictly greater than zero; any other kind fails.
pub struct IsPositive;

impl IsPositive {
    pub fn validate(value: &FieldValue, field: &str) -> Result<(), ValidationError> {
        match value {
            FieldValue::Int(n) if *n > 0 => Ok(()),
            FieldValue::Int(_) => fail(
                field,
                "isPositive",
                format!("{} must be a positive integer", field),
            ),
            FieldValue::Float(n) if *n > 0.0 => Ok(()),
            FieldValue::Float(_) => fail(
                field,
                "isPositive",
                format!("{} must be a positive float", field),
            ),
            _ => fail(
                field,
                "isPositive",
                format!("{} must be a positive number", field),
            ),
        }
    }
}

// Patterns

/// Regex match on string values. The whole value must match, as if the
/// pattern were written `^(?:pattern)$`.
pub struct Matches {
    regex: Regex,
    pattern: String,
}

impl Matches {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        // Checked on its own so `a)|(b` cannot escape the anchoring group.
        Regex::new(pattern)?;
        Ok(Self {
            regex: Regex::new(&format!("^(?:{})$", pattern))?,
            pattern: pattern.to_string(),
        })
    }

    /// The pattern as the caller wrote it
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn validate(&self, value: &FieldValue, field: &str) -> Result<(), ValidationError> {
        match_regex(&self.regex, &self.pattern, "matches", value, field)
    }

    /// Compile `pattern` and match it in one step. A pattern that does not
    /// compile fails the rule for string values instead of panicking.
    pub fn validate_pattern(
        pattern: &str,
        value: &FieldValue,
        field: &str,
    ) -> Result<(), ValidationError> {
        if !matches!(value, FieldValue::String(_)) {
            return Ok(());
        }
        match Matches::new(pattern) {
            Ok(rule) => rule.validate(value, field),
            Err(_) => fail(
                field,
                "matches",
                format!("{} has an invalid pattern {}", field, pattern),
            ),
        }
    }
}

fn match_regex(
    regex: &Regex,
    pattern: &str,
    constraint: &str,
    value: &FieldValue,
    field: &str,
) -> Result<(), ValidationError> {
    match value {
        FieldValue::String(s) if !regex.is_match(s) => fail(
            field,
            constraint,
            format!("{} must match pattern {}", field, pattern),
        ),
        _ => Ok(()),
    }
}

/// ASCII letters only
pub struct IsAlpha;

impl IsAlpha {
    pub fn validate(value: &FieldValue, field: &str) -> Result<(), ValidationError> {
        match_regex(&ALPHA_REGEX, ALPHA_REGEX.as_str(), "isAlpha", value, field)
    }
}

/// ASCII letters and digits only
pub struct IsAlphanumeric;

impl IsAlphanumeric {
    pub fn validate(value: &FieldValue, field: &str) -> Result<(), ValidationError> {
        match_regex(
            &ALPHANUMERIC_REGEX,
            ALPHANUMERIC_REGEX.as_str(),
            "isAlphanumeric",
            value,
            field,
        )
    }
}

/// ASCII digits only
pub struct IsNumeric;

impl IsNumeric {
    pub fn validate(value: &FieldValue, field: &str) -> Result<(), ValidationError> {
        match_regex(&NUMERIC_REGEX, NUMERIC_REGEX.as_str(), "isNumeric", value, field)
    }
}

/// Pragmatic address shape, not full RFC 5322
pub struct IsEmail;

impl IsEmail {
    pub fn validate(value: &FieldValue, field: &str) -> Result<(), ValidationError> {
        match value {
            FieldValue::String(s) if !EMAIL_REGEX.is_match(s) => fail(
                field,
                "isEmail",
                format!("{} must be a valid email address", field),
            ),
            _ => Ok(()),
        }
    }
}

/// Caller-supplied predicate; the message is always the generic one.
pub struct Custom;

impl Custom {
    pub fn validate<F>(predicate: F, value: &FieldValue, field: &str) -> Result<(), ValidationError>
    where
        F: FnOnce(&FieldValue) -> bool,
    {
        if predicate(value) {
            Ok(())
        } else {
            fail(
                field,
                "custom",
                format!("{} custom validation is invalid", field),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> FieldValue {
        FieldValue::from(value)
    }

    #[test]
    fn test_type_checks() {
        assert!(IsString::validate(&s("x"), "name").is_ok());
        assert!(IsString::validate(&FieldValue::Null, "name").is_err());
        assert!(IsInt::validate(&FieldValue::Int(1), "age").is_ok());
        assert!(IsInt::validate(&FieldValue::Float(1.0), "age").is_err());
        assert!(IsFloat::validate(&FieldValue::Float(1.0), "ratio").is_ok());
        assert!(IsFloat::validate(&FieldValue::Int(1), "ratio").is_err());
    }

    #[test]
    fn test_type_check_messages() {
        let err = IsString::validate(&FieldValue::Null, "InvalidField").unwrap_err();
        assert_eq!(err.message, "InvalidField must be a string");
        assert_eq!(err.constraint, "isString");

        let err = IsInt::validate(&s("30"), "age").unwrap_err();
        assert_eq!(err.message, "age must be an integer");
    }

    #[test]
    fn test_length_bounds() {
        assert!(MinLength(3).validate(&s("abc"), "name").is_ok());
        let err = MinLength(3).validate(&s("J"), "name").unwrap_err();
        assert_eq!(err.message, "name must be at least 3 characters long");

        assert!(MaxLength(5).validate(&s("exact"), "name").is_ok());
        let err = MaxLength(5).validate(&s("sixsix"), "name").unwrap_err();
        assert_eq!(err.message, "name must be at most 5 characters long");
    }

    #[test]
    fn test_length_counts_bytes() {
        // "é" is two bytes
        assert!(MaxLength(1).validate(&s("é"), "initial").is_err());
    }

    #[test]
    fn test_bounds_ignore_other_kinds() {
        assert!(MinLength(3).validate(&FieldValue::Int(1), "f").is_ok());
        assert!(MaxLength(0).validate(&FieldValue::Null, "f").is_ok());
        assert!(Min(18).validate(&s("10"), "f").is_ok());
        assert!(Max(1).validate(&FieldValue::Float(99.0), "f").is_ok());
        assert!(MinFloat(1.0).validate(&FieldValue::Int(0), "f").is_ok());
        assert!(MaxFloat(1.0).validate(&s("2.0"), "f").is_ok());
    }

    #[test]
    fn test_integer_bounds_inclusive() {
        assert!(Min(18).validate(&FieldValue::Int(18), "age").is_ok());
        assert!(Max(60).validate(&FieldValue::Int(60), "age").is_ok());
        assert_eq!(
            Min(18).validate(&FieldValue::Int(10), "age").unwrap_err().message,
            "age must be at least 18"
        );
        assert_eq!(
            Max(60).validate(&FieldValue::Int(61), "age").unwrap_err().message,
            "age must be at most 60"
        );
    }

    #[test]
    fn test_float_bounds_render_six_decimals() {
        let err = MinFloat(1.5).validate(&FieldValue::Float(1.0), "ratio").unwrap_err();
        assert_eq!(err.message, "ratio must be at least 1.500000");
        let err = MaxFloat(2.0).validate(&FieldValue::Float(2.5), "ratio").unwrap_err();
        assert_eq!(err.message, "ratio must be at most 2.000000");
    }

    #[test]
    fn test_is_positive() {
        assert!(IsPositive::validate(&FieldValue::Int(1), "n").is_ok());
        assert!(IsPositive::validate(&FieldValue::Float(0.1), "n").is_ok());
        assert_eq!(
            IsPositive::validate(&FieldValue::Int(0), "n").unwrap_err().message,
            "n must be a positive integer"
        );
        assert_eq!(
            IsPositive::validate(&FieldValue::Float(-1.0), "n").unwrap_err().message,
            "n must be a positive float"
        );
        assert_eq!(
            IsPositive::validate(&s("5"), "n").unwrap_err().message,
            "n must be a positive number"
        );
    }

    #[test]
    fn test_email() {
        assert!(IsEmail::validate(&s("newmail@mail.com"), "email").is_ok());
        assert!(IsEmail::validate(&s("user.name+tag@example.co.uk"), "email").is_ok());
        assert!(IsEmail::validate(&s("newmail"), "email").is_err());
        assert!(IsEmail::validate(&s("@example.com"), "email").is_err());
        assert!(IsEmail::validate(&s("user@example.museum"), "email").is_err());
        assert!(IsEmail::validate(&FieldValue::Int(3), "email").is_ok());
    }

    #[test]
    fn test_email_is_lower_case_only() {
        assert!(IsEmail::validate(&s("John@Mail.com"), "email").is_err());
    }

    #[test]
    fn test_fixed_patterns() {
        assert!(IsAlpha::validate(&s("abcXYZ"), "f").is_ok());
        assert!(IsAlpha::validate(&s("abc123"), "f").is_err());
        assert!(IsAlphanumeric::validate(&s("abc123"), "f").is_ok());
        assert!(IsAlphanumeric::validate(&s("abc-123"), "f").is_err());
        assert!(IsNumeric::validate(&s("12345"), "f").is_ok());
        assert!(IsNumeric::validate(&s("123.45"), "f").is_err());
        assert!(IsNumeric::validate(&s(""), "f").is_err());
        assert!(IsNumeric::validate(&FieldValue::Int(12), "f").is_ok());
    }

    #[test]
    fn test_pattern_message_names_the_pattern() {
        let err = IsAlpha::validate(&s("a1"), "code").unwrap_err();
        assert_eq!(err.message, "code must match pattern ^[a-zA-Z]+$");
        assert_eq!(err.constraint, "isAlpha");
    }

    #[test]
    fn test_matches() {
        let phone = Matches::new(r"^\d{3}-\d{3}-\d{4}$").unwrap();
        assert!(phone.validate(&s("123-456-7890"), "phone").is_ok());
        assert!(phone.validate(&s("invalid"), "phone").is_err());

        assert!(Matches::validate_pattern("^a+$", &s("aaa"), "f").is_ok());
        assert!(Matches::validate_pattern("^a+$", &FieldValue::Int(1), "f").is_ok());
    }

    #[test]
    fn test_matches_requires_full_value() {
        assert!(Matches::validate_pattern("a+", &s("aaa"), "f").is_ok());
        assert!(Matches::validate_pattern("a|b", &s("b"), "f").is_ok());

        let err = Matches::validate_pattern("a+", &s("xaaax"), "f").unwrap_err();
        assert_eq!(err.message, "f must match pattern a+");
        assert!(Matches::validate_pattern("a|b", &s("ab"), "f").is_err());
        assert!(Matches::new("a)|(b").is_err());

        let rule = Matches::new(r"\d+").unwrap();
        assert_eq!(rule.pattern(), r"\d+");
        assert!(rule.validate(&s("12a"), "code").is_err());
    }

    #[test]
    fn test_invalid_pattern_is_a_rule_failure() {
        let err = Matches::validate_pattern("(", &s("x"), "f").unwrap_err();
        assert_eq!(err.message, "f has an invalid pattern (");
        assert!(Matches::validate_pattern("(", &FieldValue::Null, "f").is_ok());
    }

    #[test]
    fn test_custom() {
        let even = |v: &FieldValue| v.as_int().is_some_and(|n| n % 2 == 0);
        assert!(Custom::validate(even, &FieldValue::Int(4), "age").is_ok());
        let err = Custom::validate(even, &FieldValue::Int(33), "age").unwrap_err();
        assert_eq!(err.message, "age custom validation is invalid");
    }
}
