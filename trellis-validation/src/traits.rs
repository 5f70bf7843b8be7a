// Field registry traits
//
// A `Record` maps field names to the fields themselves; `Reflect` describes
// what a single field is (a leaf value, a nested record, or an indirection
// in front of one) and how to assign into it. `#[derive(Record)]` writes
// both for a struct; they can also be implemented by hand.

use crate::{FieldValue, TypeMismatch};

/// A structured value with named fields.
pub trait Record {
    /// Type name reported when a whole record is read as a value.
    fn record_name(&self) -> &'static str;

    /// Look up a field by its exact, case-sensitive name.
    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    /// Mutable counterpart of [`Record::field`].
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;

    /// Read-only records refuse every write-back.
    fn is_read_only(&self) -> bool {
        false
    }
}

/// Shape of a field as seen while walking a path.
pub enum Node<'a> {
    /// A leaf, already converted
    Value(FieldValue),
    /// A nested record
    Record(&'a dyn Record),
    /// `Option`/`Box` in front of another field; `None` when empty
    Indirect(Option<&'a dyn Reflect>),
}

/// Mutable counterpart of [`Node`].
pub enum NodeMut<'a> {
    /// A leaf; assign through [`Reflect::assign`]
    Leaf,
    Record(&'a mut dyn Record),
    Indirect(Option<&'a mut dyn Reflect>),
}

/// A single field that can be read and written dynamically.
pub trait Reflect {
    fn node(&self) -> Node<'_>;

    fn node_mut(&mut self) -> NodeMut<'_>;

    /// Replace the field's contents with `value`.
    fn assign(&mut self, value: FieldValue) -> Result<(), TypeMismatch>;

    /// Build a fresh field from `value`; used to fill an empty `Option`.
    fn from_value(value: FieldValue) -> Result<Self, TypeMismatch>
    where
        Self: Sized;
}

macro_rules! reflect_int {
    ($($ty:ty),*) => {
        $(
            impl Reflect for $ty {
                // Lossless: no listed type is wider than 64 bits.
                fn node(&self) -> Node<'_> {
                    Node::Value(FieldValue::Int(*self as i128))
                }

                fn node_mut(&mut self) -> NodeMut<'_> {
                    NodeMut::Leaf
                }

                fn assign(&mut self, value: FieldValue) -> Result<(), TypeMismatch> {
                    *self = Self::from_value(value)?;
                    Ok(())
                }

                fn from_value(value: FieldValue) -> Result<Self, TypeMismatch> {
                    match value {
                        FieldValue::Int(n) => <$ty>::try_from(n).map_err(|_| {
                            TypeMismatch::new(stringify!($ty), format!("out-of-range integer {}", n))
                        }),
                        other => Err(TypeMismatch::new(stringify!($ty), other.kind())),
                    }
                }
            }
        )*
    };
}

reflect_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Reflect for f64 {
    fn node(&self) -> Node<'_> {
        Node::Value(FieldValue::Float(*self))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Leaf
    }

    fn assign(&mut self, value: FieldValue) -> Result<(), TypeMismatch> {
        *self = Self::from_value(value)?;
        Ok(())
    }

    fn from_value(value: FieldValue) -> Result<Self, TypeMismatch> {
        match value {
            FieldValue::Float(n) => Ok(n),
            other => Err(TypeMismatch::new("f64", other.kind())),
        }
    }
}

impl Reflect for f32 {
    fn node(&self) -> Node<'_> {
        Node::Value(FieldValue::Float(f64::from(*self)))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Leaf
    }

    fn assign(&mut self, value: FieldValue) -> Result<(), TypeMismatch> {
        *self = Self::from_value(value)?;
        Ok(())
    }

    fn from_value(value: FieldValue) -> Result<Self, TypeMismatch> {
        match value {
            FieldValue::Float(n) => {
                let narrowed = n as f32;
                if n.is_finite() && narrowed.is_infinite() {
                    return Err(TypeMismatch::new("f32", format!("out-of-range float {}", n)));
                }
                Ok(narrowed)
            }
            other => Err(TypeMismatch::new("f32", other.kind())),
        }
    }
}

impl Reflect for bool {
    fn node(&self) -> Node<'_> {
        Node::Value(FieldValue::Bool(*self))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Leaf
    }

    fn assign(&mut self, value: FieldValue) -> Result<(), TypeMismatch> {
        *self = Self::from_value(value)?;
        Ok(())
    }

    fn from_value(value: FieldValue) -> Result<Self, TypeMismatch> {
        match value {
            FieldValue::Bool(b) => Ok(b),
            other => Err(TypeMismatch::new("bool", other.kind())),
        }
    }
}

impl Reflect for String {
    fn node(&self) -> Node<'_> {
        Node::Value(FieldValue::String(self.clone()))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Leaf
    }

    fn assign(&mut self, value: FieldValue) -> Result<(), TypeMismatch> {
        *self = Self::from_value(value)?;
        Ok(())
    }

    fn from_value(value: FieldValue) -> Result<Self, TypeMismatch> {
        match value {
            FieldValue::String(s) => Ok(s),
            other => Err(TypeMismatch::new("string", other.kind())),
        }
    }
}

impl Reflect for char {
    fn node(&self) -> Node<'_> {
        Node::Value(FieldValue::String(self.to_string()))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Leaf
    }

    fn assign(&mut self, value: FieldValue) -> Result<(), TypeMismatch> {
        *self = Self::from_value(value)?;
        Ok(())
    }

    fn from_value(value: FieldValue) -> Result<Self, TypeMismatch> {
        let found = value.kind();
        if let FieldValue::String(s) = value {
            let mut chars = s.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return Ok(c);
            }
            return Err(TypeMismatch::new("char", format!("string of length {}", s.len())));
        }
        Err(TypeMismatch::new("char", found))
    }
}

/// Collections are opaque to path resolution.
impl<T> Reflect for Vec<T> {
    fn node(&self) -> Node<'_> {
        Node::Value(FieldValue::Other("Vec"))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Leaf
    }

    fn assign(&mut self, value: FieldValue) -> Result<(), TypeMismatch> {
        Err(TypeMismatch::new("Vec", value.kind()))
    }

    fn from_value(value: FieldValue) -> Result<Self, TypeMismatch> {
        Err(TypeMismatch::new("Vec", value.kind()))
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn node(&self) -> Node<'_> {
        Node::Indirect(self.as_ref().map(|inner| inner as &dyn Reflect))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Indirect(self.as_mut().map(|inner| inner as &mut dyn Reflect))
    }

    /// `Null` empties the option; anything else is assigned into the
    /// existing value or, when empty, used to build a new one.
    fn assign(&mut self, value: FieldValue) -> Result<(), TypeMismatch> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        if let Some(inner) = self.as_mut() {
            return inner.assign(value);
        }
        *self = Some(T::from_value(value)?);
        Ok(())
    }

    fn from_value(value: FieldValue) -> Result<Self, TypeMismatch> {
        match value {
            FieldValue::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn node(&self) -> Node<'_> {
        Node::Indirect(Some(&**self as &dyn Reflect))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Indirect(Some(&mut **self as &mut dyn Reflect))
    }

    fn assign(&mut self, value: FieldValue) -> Result<(), TypeMismatch> {
        (**self).assign(value)
    }

    fn from_value(value: FieldValue) -> Result<Self, TypeMismatch> {
        T::from_value(value).map(Box::new)
    }
}

impl<T: Record + ?Sized> Record for &T {
    fn record_name(&self) -> &'static str {
        (**self).record_name()
    }

    fn field(&self, name: &str) -> Option<&dyn Reflect> {
        (**self).field(name)
    }

    fn field_mut(&mut self, _name: &str) -> Option<&mut dyn Reflect> {
        None
    }

    fn is_read_only(&self) -> bool {
        true
    }
}

impl<T: Record + ?Sized> Record for &mut T {
    fn record_name(&self) -> &'static str {
        (**self).record_name()
    }

    fn field(&self, name: &str) -> Option<&dyn Reflect> {
        (**self).field(name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
        (**self).field_mut(name)
    }

    fn is_read_only(&self) -> bool {
        (**self).is_read_only()
    }
}

impl<T: Record + ?Sized> Record for Box<T> {
    fn record_name(&self) -> &'static str {
        (**self).record_name()
    }

    fn field(&self, name: &str) -> Option<&dyn Reflect> {
        (**self).field(name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
        (**self).field_mut(name)
    }

    fn is_read_only(&self) -> bool {
        (**self).is_read_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_leaf(field: &dyn Reflect) -> FieldValue {
        match field.node() {
            Node::Value(value) => value,
            Node::Record(record) => FieldValue::Other(record.record_name()),
            Node::Indirect(Some(inner)) => read_leaf(inner),
            Node::Indirect(None) => FieldValue::Null,
        }
    }

    #[test]
    fn test_integers_widen_losslessly() {
        assert_eq!(read_leaf(&7u8), FieldValue::Int(7));
        assert_eq!(read_leaf(&-3i32), FieldValue::Int(-3));
        assert_eq!(read_leaf(&u64::MAX), FieldValue::Int(u64::MAX as i128));
        assert_eq!(read_leaf(&i64::MIN), FieldValue::Int(i64::MIN as i128));
    }

    #[test]
    fn test_large_unsigned_round_trips() {
        let mut hits = u64::MAX;
        let value = read_leaf(&hits);
        hits.assign(value).unwrap();
        assert_eq!(hits, u64::MAX);

        let err = hits.assign(FieldValue::Int(-1)).unwrap_err();
        assert_eq!(err, TypeMismatch::new("u64", "out-of-range integer -1"));
    }

    #[test]
    fn test_f32_rejects_out_of_range_floats() {
        let mut ratio = 0.5f32;
        let err = ratio.assign(FieldValue::Float(1e300)).unwrap_err();
        assert_eq!(err.expected, "f32");
        assert_eq!(ratio, 0.5);

        ratio.assign(FieldValue::Float(f64::INFINITY)).unwrap();
        assert!(ratio.is_infinite());
    }

    #[test]
    fn test_integer_assign_checks_range() {
        let mut small = 1u8;
        assert!(small.assign(FieldValue::Int(200)).is_ok());
        assert_eq!(small, 200);

        let err = small.assign(FieldValue::Int(300)).unwrap_err();
        assert_eq!(err.expected, "u8");
        assert_eq!(small, 200);
    }

    #[test]
    fn test_assign_rejects_other_kinds() {
        let mut age = 30i64;
        let err = age.assign(FieldValue::from("thirty")).unwrap_err();
        assert_eq!(err, TypeMismatch::new("i64", "string"));

        let mut ratio = 0.5f64;
        assert!(ratio.assign(FieldValue::Int(1)).is_err());
    }

    #[test]
    fn test_option_reads_through_and_allocates_on_write() {
        let mut nickname: Option<String> = None;
        assert_eq!(read_leaf(&nickname), FieldValue::Null);

        nickname.assign(FieldValue::from("jd")).unwrap();
        assert_eq!(nickname.as_deref(), Some("jd"));
        assert_eq!(read_leaf(&nickname), FieldValue::from("jd"));

        nickname.assign(FieldValue::Null).unwrap();
        assert!(nickname.is_none());
    }

    #[test]
    fn test_box_is_transparent() {
        let mut boxed = Box::new(5i32);
        assert_eq!(read_leaf(&boxed), FieldValue::Int(5));
        boxed.assign(FieldValue::Int(6)).unwrap();
        assert_eq!(*boxed, 6);
    }

    #[test]
    fn test_char_needs_single_character() {
        let mut initial = 'a';
        initial.assign(FieldValue::from("b")).unwrap();
        assert_eq!(initial, 'b');
        assert!(initial.assign(FieldValue::from("bc")).is_err());
    }

    #[test]
    fn test_vec_is_opaque() {
        let mut tags = vec!["a".to_string()];
        assert_eq!(read_leaf(&tags), FieldValue::Other("Vec"));
        assert!(tags.assign(FieldValue::from("b")).is_err());
    }
}
