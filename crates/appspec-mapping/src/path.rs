//! Path resolution into nested job results
//!
//! A path is an ordered list of string segments. Against a list a segment is
//! a decimal index, against a mapping it is a key. Anything that does not
//! line up resolves to "absent" rather than failing.

use serde_json::{Map, Value};

/// Structural view of a value for path walking
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    /// Indexed by position
    List(&'a [Value]),
    /// Indexed by key
    Mapping(&'a Map<String, Value>),
    /// Null, bool, number or string; has no children
    Scalar(&'a Value),
}

impl<'a> Shape<'a> {
    /// Classify a value
    #[must_use]
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Self::List(items),
            Value::Object(map) => Self::Mapping(map),
            other => Self::Scalar(other),
        }
    }

    /// Child at one segment
    #[must_use]
    pub fn child(self, segment: &str) -> Option<&'a Value> {
        match self {
            Self::List(items) => parse_index(segment).and_then(|i| items.get(i)),
            Self::Mapping(map) => map.get(segment),
            Self::Scalar(_) => None,
        }
    }
}

fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Follow `path` into `value`
///
/// Returns `None` when a key is missing, an index is out of range or not a
/// number, or a scalar is reached with segments left over. An empty path
/// returns `value` itself.
#[must_use]
pub fn resolve<'a, S: AsRef<str>>(value: &'a Value, path: &[S]) -> Option<&'a Value> {
    let Some((head, tail)) = path.split_first() else {
        return Some(value);
    };
    let child = Shape::of(value).child(head.as_ref())?;
    resolve(child, tail)
}

/// Like [`resolve`], cloning the result and using `Value::Null` for absent
#[must_use]
pub fn resolve_owned<S: AsRef<str>>(value: &Value, path: &[S]) -> Value {
    resolve(value, path).cloned().unwrap_or(Value::Null)
}
