//! Error types for parameter validation
//!
//! Presence and unknown-key failures stop validation immediately and carry
//! every offending id. Value failures are collected across all parameters
//! and reported together.

use appspec_model::SpecificationError;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Which app a validation ran for, quoted in fail-fast messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppLabel {
    /// App id
    pub app_id: Option<String>,
    /// Release tag
    pub tag: Option<String>,
}

impl Display for AppLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (&self.app_id, &self.tag) {
            (Some(app), Some(tag)) => write!(f, " for app '{app}' (tag {tag})"),
            (Some(app), None) => write!(f, " for app '{app}'"),
            _ => Ok(()),
        }
    }
}

/// One rejected value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterError {
    /// Parameter id
    pub parameter: String,
    /// Position within a multi-valued submission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// What is wrong with the value
    pub message: String,
}

impl ParameterError {
    /// Create error for a parameter
    pub fn new(parameter: impl Into<String>, index: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            index,
            message: message.into(),
        }
    }
}

impl Display for ParameterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}[{}] - {}", self.parameter, i, self.message),
            None => write!(f, "{} - {}", self.parameter, self.message),
        }
    }
}

/// Submitted parameters violate the spec
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required parameters without a default were not submitted
    #[error("missing required parameters [{}]{app}", .ids.join(", "))]
    MissingParameters { ids: Vec<String>, app: AppLabel },

    /// Submitted keys that the spec does not declare
    #[error("unknown parameters [{}]{app}; maybe something was misspelled?", .ids.join(", "))]
    UnknownParameters { ids: Vec<String>, app: AppLabel },

    /// One or more values failed their rules
    #[error("parameter value errors found:\n{}", join_lines(.errors))]
    InvalidValues { errors: Vec<ParameterError> },
}

fn join_lines(errors: &[ParameterError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl ValidationError {
    /// Ordered, human-readable messages
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::InvalidValues { errors } => errors.iter().map(ToString::to_string).collect(),
            other => vec![other.to_string()],
        }
    }

    /// Parameter ids the error is about, in report order, without repeats
    #[must_use]
    pub fn parameter_ids(&self) -> Vec<&str> {
        match self {
            Self::MissingParameters { ids, .. } | Self::UnknownParameters { ids, .. } => {
                ids.iter().map(String::as_str).collect()
            }
            Self::InvalidValues { errors } => {
                let mut ids: Vec<&str> = Vec::new();
                for e in errors {
                    if !ids.contains(&e.parameter.as_str()) {
                        ids.push(&e.parameter);
                    }
                }
                ids
            }
        }
    }
}

/// Failure of a validation call that also checks the spec itself
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// The spec is malformed
    #[error(transparent)]
    Specification(#[from] SpecificationError),

    /// The submitted parameters are invalid
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
