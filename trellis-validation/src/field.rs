// Fluent rule chain for a single field

use crate::rules::*;
use crate::{AccessError, FieldValue, Record, ValidationError, Validator};
use trellis_log::warn;

/// One field's path and current value, bound to the [`Validator`] that
/// collects its errors.
///
/// Every rule runs and returns the same chain; a failure is forwarded to the
/// validator immediately and never stops the rules after it.
pub struct FieldValidator<'v, R: Record> {
    validator: &'v mut Validator<R>,
    name: String,
    value: FieldValue,
}

impl<'v, R: Record> FieldValidator<'v, R> {
    pub(crate) fn new(validator: &'v mut Validator<R>, name: &str, value: FieldValue) -> Self {
        Self {
            validator,
            name: name.to_string(),
            value,
        }
    }

    /// Dotted path this chain was created for
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current value, including the effect of earlier transforms
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    fn check(&mut self, outcome: Result<(), ValidationError>) -> &mut Self {
        if let Err(error) = outcome {
            self.validator.add_error(error);
        }
        self
    }

    pub fn is_string(&mut self) -> &mut Self {
        let outcome = IsString::validate(&self.value, &self.name);
        self.check(outcome)
    }

    pub fn is_int(&mut self) -> &mut Self {
        let outcome = IsInt::validate(&self.value, &self.name);
        self.check(outcome)
    }

    pub fn is_float(&mut self) -> &mut Self {
        let outcome = IsFloat::validate(&self.value, &self.name);
        self.check(outcome)
    }

    /// Minimum length in bytes; only applies to strings.
    pub fn min_length(&mut self, length: usize) -> &mut Self {
        let outcome = MinLength(length).validate(&self.value, &self.name);
        self.check(outcome)
    }

    /// Maximum length in bytes; only applies to strings.
    pub fn max_length(&mut self, length: usize) -> &mut Self {
        let outcome = MaxLength(length).validate(&self.value, &self.name);
        self.check(outcome)
    }

    pub fn min(&mut self, min: i64) -> &mut Self {
        let outcome = Min(min).validate(&self.value, &self.name);
        self.check(outcome)
    }

    pub fn max(&mut self, max: i64) -> &mut Self {
        let outcome = Max(max).validate(&self.value, &self.name);
        self.check(outcome)
    }

    pub fn min_float(&mut self, min: f64) -> &mut Self {
        let outcome = MinFloat(min).validate(&self.value, &self.name);
        self.check(outcome)
    }

    pub fn max_float(&mut self, max: f64) -> &mut Self {
        let outcome = MaxFloat(max).validate(&self.value, &self.name);
        self.check(outcome)
    }

    /// Fails for anything that is not a number greater than zero.
    pub fn is_positive(&mut self) -> &mut Self {
        let outcome = IsPositive::validate(&self.value, &self.name);
        self.check(outcome)
    }

    /// Regex match on strings; the pattern must match the whole value.
    pub fn matches(&mut self, pattern: &str) -> &mut Self {
        let outcome = Matches::validate_pattern(pattern, &self.value, &self.name);
        self.check(outcome)
    }

    pub fn is_alpha(&mut self) -> &mut Self {
        let outcome = IsAlpha::validate(&self.value, &self.name);
        self.check(outcome)
    }

    pub fn is_alphanumeric(&mut self) -> &mut Self {
        let outcome = IsAlphanumeric::validate(&self.value, &self.name);
        self.check(outcome)
    }

    pub fn is_numeric(&mut self) -> &mut Self {
        let outcome = IsNumeric::validate(&self.value, &self.name);
        self.check(outcome)
    }

    /// Lower-case address shape check; mixed-case input fails.
    pub fn is_email(&mut self) -> &mut Self {
        let outcome = IsEmail::validate(&self.value, &self.name);
        self.check(outcome)
    }

    /// Run `predicate` on the raw value. A `false` records
    /// `"<field> custom validation is invalid"`.
    pub fn custom<F>(&mut self, predicate: F) -> &mut Self
    where
        F: FnOnce(&FieldValue) -> bool,
    {
        let outcome = Custom::validate(predicate, &self.value, &self.name);
        self.check(outcome)
    }

    /// Replace the value with `f(value)` and write it back into the record.
    ///
    /// Later rules in the chain see the value as the record stored it. On
    /// error the record and the chain's value are left as they were.
    pub fn try_transform<F>(&mut self, f: F) -> Result<&mut Self, AccessError>
    where
        F: FnOnce(FieldValue) -> FieldValue,
    {
        let value = f(self.value.clone());
        if let Err(err) = self.validator.write_back(&self.name, value) {
            warn!(target: "trellis::validator", "transform of {} failed: {}", self.name, err);
            return Err(err);
        }
        // The leaf may have narrowed the value, e.g. an `f32` field.
        self.value = self.validator.read_back(&self.name);
        Ok(self)
    }

    /// Like [`try_transform`](Self::try_transform), for paths that are known
    /// to be writable.
    ///
    /// # Panics
    ///
    /// Panics if the path cannot be written: an unknown field, an empty
    /// `Option` on the way to it, a read-only record, or a value the field
    /// cannot hold.
    pub fn transform<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(FieldValue) -> FieldValue,
    {
        match self.try_transform(f) {
            Ok(this) => this,
            Err(err) => panic!("transform failed: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Node, NodeMut, Reflect, TypeMismatch};
    use std::cell::Cell;

    struct Login {
        user: String,
        attempts: i64,
    }

    impl Record for Login {
        fn record_name(&self) -> &'static str {
            "Login"
        }

        fn field(&self, name: &str) -> Option<&dyn Reflect> {
            match name {
                "user" => Some(&self.user),
                "attempts" => Some(&self.attempts),
                _ => None,
            }
        }

        fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
            match name {
                "user" => Some(&mut self.user),
                "attempts" => Some(&mut self.attempts),
                _ => None,
            }
        }
    }

    impl Reflect for Login {
        fn node(&self) -> Node<'_> {
            Node::Record(self)
        }

        fn node_mut(&mut self) -> NodeMut<'_> {
            NodeMut::Record(self)
        }

        fn assign(&mut self, value: FieldValue) -> Result<(), TypeMismatch> {
            Err(TypeMismatch::new("Login", value.kind()))
        }

        fn from_value(value: FieldValue) -> Result<Self, TypeMismatch> {
            Err(TypeMismatch::new("Login", value.kind()))
        }
    }

    fn login() -> Login {
        Login {
            user: "J".to_string(),
            attempts: 3,
        }
    }

    #[test]
    fn test_chain_does_not_short_circuit() {
        let mut login = login();
        let mut v = Validator::new(&mut login);
        v.field("user").is_int().min_length(3).is_email().is_numeric();

        let constraints: Vec<_> = v.errors().iter().map(|e| e.constraint.as_str()).collect();
        assert_eq!(constraints, vec!["isInt", "minLength", "isEmail", "isNumeric"]);
    }

    #[test]
    fn test_every_rule_runs_once() {
        let calls = Cell::new(0);
        let mut login = login();
        let mut v = Validator::new(&mut login);
        v.field("attempts")
            .custom(|_| {
                calls.set(calls.get() + 1);
                false
            })
            .custom(|_| {
                calls.set(calls.get() + 1);
                true
            })
            .is_string();

        assert_eq!(calls.get(), 2);
        assert_eq!(v.error_count(), 2);
    }

    #[test]
    fn test_missing_field_is_a_type_mismatch_only() {
        let mut login = login();
        let mut v = Validator::new(&mut login);
        v.field("InvalidField")
            .is_string()
            .min_length(3)
            .max_length(1)
            .min(1)
            .matches("^x$");

        assert_eq!(v.error_count(), 1);
        assert_eq!(v.errors()[0].message, "InvalidField must be a string");
    }

    #[test]
    fn test_transform_updates_chain_and_record() {
        let mut login = login();
        let mut v = Validator::new(&mut login);
        let mut chain = v.field("user");
        chain
            .transform(|value| match value {
                FieldValue::String(s) => FieldValue::String(s.repeat(3)),
                other => other,
            })
            .min_length(3);
        assert_eq!(chain.value(), &FieldValue::from("JJJ"));
        assert_eq!(chain.name(), "user");
        drop(chain);

        assert!(!v.has_errors());
        assert_eq!(login.user, "JJJ");
    }

    #[test]
    fn test_try_transform_reports_fault_and_keeps_value() {
        let mut login = login();
        let mut v = Validator::new(&mut login);
        let mut chain = v.field("attempts");

        let err = chain
            .try_transform(|_| FieldValue::from("many"))
            .err()
            .unwrap();
        assert!(matches!(err, AccessError::TypeMismatch { .. }));
        assert_eq!(chain.value(), &FieldValue::Int(3));
        drop(chain);

        assert!(!v.has_errors());
        assert_eq!(login.attempts, 3);
    }

    #[test]
    fn test_transform_on_unknown_field_faults() {
        let mut login = login();
        let mut v = Validator::new(&mut login);
        let err = v
            .field("missing")
            .try_transform(|_| FieldValue::Int(1))
            .err()
            .unwrap();
        assert_eq!(
            err,
            AccessError::UnknownField {
                path: "missing".to_string(),
                segment: "missing".to_string(),
            }
        );
    }

    #[test]
    #[should_panic(expected = "transform failed")]
    fn test_transform_panics_on_read_only_record() {
        let login = login();
        let mut v = Validator::new(&login);
        v.field("attempts").transform(|_| FieldValue::Int(0));
    }
}
