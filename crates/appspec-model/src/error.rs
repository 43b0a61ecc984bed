//! Error types for the spec model
//!
//! Provides error handling for:
//! - Malformed spec structure (missing blocks, bad mappings)
//! - Parameter list invariants (duplicate ids, dangling group members)
//! - Spec loading (parse and IO failures)
//! - Object store lookups

use std::path::PathBuf;

/// A malformed app spec or mapping
///
/// These are authoring bugs in the spec, never problems with user input.
/// Callers should treat them as fatal.
#[derive(Debug, thiserror::Error)]
pub enum SpecificationError {
    /// The spec has no `behavior` block
    #[error("invalid app spec: missing behavior block")]
    MissingBehavior,

    /// An input mapping points past the end of the job inputs
    #[error("input mapping for '{parameter}' targets position {position}, but the job has {len} inputs")]
    PositionOutOfRange {
        parameter: String,
        position: usize,
        len: usize,
    },

    /// Two parameters share one id
    #[error("duplicate parameter id: '{0}'")]
    DuplicateParameter(String),

    /// A group lists a member id that is not in the spec
    #[error("group '{group}' lists unknown member '{member}'")]
    UnknownGroupMember { group: String, member: String },

    /// A checkbox parameter has no checkbox map
    #[error("checkbox parameter '{0}' has no checkbox_map")]
    MissingCheckboxMap(String),

    /// A type or regex pattern does not compile
    #[error("parameter '{parameter}' has invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        parameter: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Syntax error while parsing spec text
    #[error("cannot parse {format} spec: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// IO error while reading a spec file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SpecificationError {
    /// Create parse error for a format
    pub fn parse(format: &'static str, message: impl ToString) -> Self {
        Self::Parse {
            format,
            message: message.to_string(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Object store lookup failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No object matches the lookup
    #[error("object not found: {0}")]
    NotFound(String),

    /// The store could not answer
    #[error("object store unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for spec operations
pub type SpecResult<T> = Result<T, SpecificationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_behavior_display() {
        let err = SpecificationError::MissingBehavior;
        assert_eq!(err.to_string(), "invalid app spec: missing behavior block");
    }

    #[test]
    fn position_out_of_range_display() {
        let err = SpecificationError::PositionOutOfRange {
            parameter: "reads".to_string(),
            position: 3,
            len: 2,
        };
        assert!(err.to_string().contains("position 3"));
        assert!(err.to_string().contains("'reads'"));
    }

    #[test]
    fn invalid_pattern_keeps_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = SpecificationError::InvalidPattern {
            parameter: "p".to_string(),
            pattern: "(".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn resolve_error_display() {
        let err = ResolveError::NotFound("1/2/3".to_string());
        assert_eq!(err.to_string(), "object not found: 1/2/3");
    }
}
