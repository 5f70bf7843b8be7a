//! Dotted-path field access.
//!
//! [`read`] and [`write`] walk the same [`FieldPath`] with the same
//! indirection rules, so a path always addresses the same storage. They
//! differ only in how a broken path is reported: a read yields
//! [`FieldValue::Null`], a write returns an [`AccessError`].

use crate::{AccessError, FieldValue, Node, NodeMut, Record, Reflect};
use trellis_log::trace;

const TARGET: &str = "trellis::access";

/// A dotted field path such as `"address.city"`.
///
/// Segments are exact, case-sensitive field names. There is no escaping, so
/// a field whose name contains `.` cannot be addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath<'a> {
    raw: &'a str,
}

impl<'a> FieldPath<'a> {
    pub fn parse(raw: &'a str) -> Result<Self, AccessError> {
        if raw.is_empty() {
            return Err(AccessError::EmptyPath);
        }
        Ok(Self { raw })
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    pub fn segments(&self) -> std::str::Split<'a, char> {
        self.raw.split('.')
    }

    pub fn len(&self) -> usize {
        self.segments().count()
    }

    /// Parsed paths are never empty.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Everything but the last segment, and the last segment.
    fn split_leaf(&self) -> (Option<&'a str>, &'a str) {
        match self.raw.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, self.raw),
        }
    }
}

/// Why a walk stopped before reaching a record.
enum Stop {
    NotARecord,
    Null,
}

fn deref_record(field: &dyn Reflect) -> Result<&dyn Record, Stop> {
    match field.node() {
        Node::Record(record) => Ok(record),
        Node::Indirect(Some(inner)) => deref_record(inner),
        Node::Indirect(None) => Err(Stop::Null),
        Node::Value(_) => Err(Stop::NotARecord),
    }
}

fn deref_record_mut(field: &mut dyn Reflect) -> Result<&mut dyn Record, Stop> {
    match field.node_mut() {
        NodeMut::Record(record) => Ok(record),
        NodeMut::Indirect(Some(inner)) => deref_record_mut(inner),
        NodeMut::Indirect(None) => Err(Stop::Null),
        NodeMut::Leaf => Err(Stop::NotARecord),
    }
}

fn deref_value(field: &dyn Reflect) -> FieldValue {
    match field.node() {
        Node::Value(value) => value,
        Node::Record(record) => FieldValue::Other(record.record_name()),
        Node::Indirect(Some(inner)) => deref_value(inner),
        Node::Indirect(None) => FieldValue::Null,
    }
}

/// Read the value at `path`.
///
/// Unknown segments, non-record intermediates and empty `Option`s all read
/// as [`FieldValue::Null`]; this never fails.
pub fn read(record: &dyn Record, path: &str) -> FieldValue {
    let Ok(path) = FieldPath::parse(path) else {
        return FieldValue::Null;
    };

    let (parents, leaf) = path.split_leaf();
    let mut current = record;
    for segment in parents.into_iter().flat_map(|p| p.split('.')) {
        let resolved = current.field(segment).ok_or(Stop::NotARecord).and_then(deref_record);
        match resolved {
            Ok(next) => current = next,
            Err(_) => {
                trace!(target: TARGET, "read {}: stopped at `{}`", path.as_str(), segment);
                return FieldValue::Null;
            }
        }
    }

    let value = current.field(leaf).map_or(FieldValue::Null, deref_value);
    trace!(target: TARGET, "read {} -> {:?}", path.as_str(), value);
    value
}

/// Assign `value` to the field at `path`.
///
/// Walks exactly like [`read`], but every way the walk can break is an
/// error: the caller asked to store a value somewhere that does not exist.
pub fn write(record: &mut dyn Record, path: &str, value: FieldValue) -> Result<(), AccessError> {
    let path = FieldPath::parse(path)?;
    let raw = path.as_str();

    if record.is_read_only() {
        return Err(AccessError::ReadOnly {
            path: raw.to_string(),
        });
    }

    let (parents, leaf) = path.split_leaf();
    let mut current = record;
    for segment in parents.into_iter().flat_map(|p| p.split('.')) {
        let field = current
            .field_mut(segment)
            .ok_or_else(|| unknown_field(raw, segment))?;
        current = deref_record_mut(field).map_err(|stop| match stop {
            Stop::NotARecord => AccessError::NotARecord {
                path: raw.to_string(),
                segment: segment.to_string(),
            },
            Stop::Null => AccessError::NullIndirection {
                path: raw.to_string(),
                segment: segment.to_string(),
            },
        })?;
    }

    let field = current
        .field_mut(leaf)
        .ok_or_else(|| unknown_field(raw, leaf))?;

    trace!(target: TARGET, "write {} <- {:?}", raw, value);
    field
        .assign(value)
        .map_err(|mismatch| AccessError::mismatch(raw, mismatch))
}

fn unknown_field(path: &str, segment: &str) -> AccessError {
    AccessError::UnknownField {
        path: path.to_string(),
        segment: segment.to_string(),
    }
}
