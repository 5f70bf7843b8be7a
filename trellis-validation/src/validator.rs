// Validation session

use crate::access;
use crate::{AccessError, FieldValidator, FieldValue, Record, ValidationError, ValidationErrors};
use trellis_log::debug;

/// Owns a record and the errors reported against it.
///
/// `R` is usually `&mut T` (validate in place) or `T` itself (take the
/// record back with [`Validator::into_inner`]). A `&T` works for
/// rule-only passes; any `transform` on it faults.
///
/// ```
/// use trellis_validation::{FieldValue, Validator};
/// # use trellis_validation::{Record, Reflect};
/// # struct User { age: i64 }
/// # impl Record for User {
/// #     fn record_name(&self) -> &'static str { "User" }
/// #     fn field(&self, name: &str) -> Option<&dyn Reflect> {
/// #         if name == "age" { Some(&self.age) } else { None }
/// #     }
/// #     fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
/// #         if name == "age" { Some(&mut self.age) } else { None }
/// #     }
/// # }
///
/// let mut user = User { age: 33 };
/// let mut v = Validator::new(&mut user);
/// v.field("age").is_int().min(18).max(60);
/// v.field("age").transform(|age| match age {
///     FieldValue::Int(n) => FieldValue::Int(n * 2),
///     other => other,
/// });
///
/// assert!(!v.has_errors());
/// assert_eq!(user.age, 66);
/// ```
pub struct Validator<R> {
    record: R,
    errors: Vec<ValidationError>,
}

impl<R: Record> Validator<R> {
    pub fn new(record: R) -> Self {
        Self {
            record,
            errors: Vec::new(),
        }
    }

    /// Start a rule chain for the field at `path`.
    ///
    /// The value is read once, here. A path that does not resolve yields
    /// [`FieldValue::Null`], which every type check rejects.
    pub fn field(&mut self, path: &str) -> FieldValidator<'_, R> {
        let value = access::read(&self.record, path);
        FieldValidator::new(self, path, value)
    }

    /// Returns true if any rule has failed so far
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors in the order they were reported
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    pub fn into_inner(self) -> R {
        self.record
    }

    /// Hand back the record if nothing failed, the errors otherwise.
    pub fn into_result(self) -> Result<R, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(self.record)
        } else {
            Err(ValidationErrors::new(self.errors))
        }
    }

    pub(crate) fn add_error(&mut self, error: ValidationError) {
        debug!(target: "trellis::validator", "{}", error);
        self.errors.push(error);
    }

    pub(crate) fn write_back(&mut self, path: &str, value: FieldValue) -> Result<(), AccessError> {
        access::write(&mut self.record, path, value)
    }

    pub(crate) fn read_back(&self, path: &str) -> FieldValue {
        access::read(&self.record, path)
    }
}
