//! Start-anchored patterns
//!
//! Type names and regex constraints in app specs match from the beginning of
//! the subject but not necessarily to its end, so `KBaseGenomes.Genome`
//! accepts `KBaseGenomes.Genome-8.2`.

use crate::error::SpecificationError;
use regex::Regex;
use std::fmt::{self, Display, Formatter};

/// A compiled pattern that must match at the start of the subject
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern declared by `parameter`
    ///
    /// # Errors
    /// Returns [`SpecificationError::InvalidPattern`] if the pattern is not a
    /// valid regular expression.
    pub fn compile(parameter: &str, pattern: &str) -> Result<Self, SpecificationError> {
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
            SpecificationError::InvalidPattern {
                parameter: parameter.to_string(),
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Check whether the subject starts with a match
    #[inline]
    #[must_use]
    pub fn matches(&self, subject: &str) -> bool {
        self.regex.is_match(subject)
    }

    /// The pattern as written in the spec
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
