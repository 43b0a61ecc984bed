//! Error types for appspec core
//!
//! [`AppError`] is the single error returned by the session facade. It wraps
//! the spec and validation errors of the lower crates and adds the failures
//! that only exist at session level.

use crate::tag::InvalidTag;
use appspec_mapping::SystemVariable;
use appspec_model::SpecificationError;
use appspec_validate::ValidationError;
use std::path::PathBuf;

/// Main appspec error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Spec or mapping is malformed
    #[error("specification error: {0}")]
    Specification(#[from] SpecificationError),

    /// Submitted parameters are invalid
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unknown release tag
    #[error(transparent)]
    InvalidTag(#[from] InvalidTag),

    /// The current workspace cannot be determined
    #[error("workspace unavailable: system variable {0} is not set")]
    WorkspaceUnavailable(SystemVariable),

    /// Configuration text is malformed
    #[error("configuration error: {0}")]
    Config(String),

    /// File could not be read
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// Create IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the caller submitted bad parameters, as opposed to a broken
    /// spec or environment
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type for appspec core
pub type AppResult<T> = Result<T, AppError>;
