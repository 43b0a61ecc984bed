//! Session configuration
//!
//! Loaded from TOML; every key is optional:
//!
//! ```toml
//! default_output_widget = "kbaseDefaultNarrativeOutput"
//! workspace_env = "KB_WORKSPACE_ID"
//! token_env = "KB_AUTH_TOKEN"
//! default_tag = "release"
//! ```

use crate::error::AppError;
use crate::tag::ReleaseTag;
use appspec_mapping::{ProcessContext, DEFAULT_OUTPUT_WIDGET};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// appspec configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSpecConfig {
    /// Widget used when a spec names none
    pub default_output_widget: String,
    /// Environment variable holding the workspace name
    pub workspace_env: String,
    /// Environment variable holding the auth token
    pub token_env: String,
    /// Tag assumed when a caller gives none
    pub default_tag: ReleaseTag,
}

impl AppSpecConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With default output widget
    #[inline]
    #[must_use]
    pub fn with_default_widget(mut self, widget: impl Into<String>) -> Self {
        self.default_output_widget = widget.into();
        self
    }

    /// With workspace environment variable
    #[inline]
    #[must_use]
    pub fn with_workspace_env(mut self, var: impl Into<String>) -> Self {
        self.workspace_env = var.into();
        self
    }

    /// With token environment variable
    #[inline]
    #[must_use]
    pub fn with_token_env(mut self, var: impl Into<String>) -> Self {
        self.token_env = var.into();
        self
    }

    /// With default release tag
    #[inline]
    #[must_use]
    pub fn with_default_tag(mut self, tag: ReleaseTag) -> Self {
        self.default_tag = tag;
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// [`AppError::Config`] on malformed TOML or unknown tag names.
    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// [`AppError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AppError::io_error(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Read workspace and token from the configured environment variables
    #[must_use]
    pub fn process_context(&self) -> ProcessContext {
        ProcessContext::from_env(&self.workspace_env, &self.token_env)
    }
}

impl Default for AppSpecConfig {
    fn default() -> Self {
        Self {
            default_output_widget: DEFAULT_OUTPUT_WIDGET.to_string(),
            workspace_env: "KB_WORKSPACE_ID".to_string(),
            token_env: "KB_AUTH_TOKEN".to_string(),
            default_tag: ReleaseTag::Release,
        }
    }
}
