//! Input encodings and their reversal
//!
//! An input mapping may declare how a parameter was encoded on its way into a
//! job (`target_type_transform`). Reversing it recovers what the user
//! submitted.

use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// A named input encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Object name qualified with its workspace, `ws/name`
    Ref,
    /// Element-wise encoding of a list
    List(Box<Transform>),
    /// Tag this crate does not know; reversal leaves values alone
    Unknown(String),
}

impl Transform {
    /// Parse a transform tag such as `ref` or `list(ref)`
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim();
        if tag == "ref" {
            return Self::Ref;
        }
        match tag
            .strip_prefix("list(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Some(inner) => Self::List(Box::new(Self::parse(inner))),
            None => Self::Unknown(tag.to_string()),
        }
    }

    /// Undo the encoding, consuming the value
    ///
    /// A list transform applied to a non-list, or a ref transform applied to a
    /// non-string, returns the value unchanged.
    #[must_use]
    pub fn reverse(&self, value: Value) -> Value {
        match (self, value) {
            (Self::Ref, Value::String(s)) => Value::String(strip_workspace(&s).to_string()),
            (Self::List(inner), Value::Array(items)) => {
                Value::Array(items.into_iter().map(|v| inner.reverse(v)).collect())
            }
            (_, other) => other,
        }
    }
}

impl Display for Transform {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ref => f.write_str("ref"),
            Self::List(inner) => write!(f, "list({inner})"),
            Self::Unknown(tag) => f.write_str(tag),
        }
    }
}

/// Drop everything up to and including the first `/`
fn strip_workspace(reference: &str) -> &str {
    reference
        .split_once('/')
        .map_or(reference, |(_, rest)| rest)
}
