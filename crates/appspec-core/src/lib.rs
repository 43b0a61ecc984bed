//! appspec Core
//!
//! Entry point for callers that run apps: configuration, release tags and a
//! session that validates submissions and maps job inputs and results.
//!
//! # Example
//!
//! ```rust
//! use appspec_core::{AppSession, AppSpecConfig};
//! use appspec_mapping::{ContextSystemVariables, ProcessContext};
//! use appspec_model::{AppSpec, MemoryCatalog};
//! use serde_json::Map;
//!
//! let catalog = MemoryCatalog::new().with_workspace(7, "my_ws");
//! let system = ContextSystemVariables::new(
//!     ProcessContext::new(Some("my_ws".to_string()), None),
//!     catalog.clone(),
//! );
//! let session = AppSession::new(AppSpecConfig::default(), &catalog, &system);
//!
//! let spec = AppSpec::from_json_str(r#"{"parameters": []}"#).unwrap();
//! let validated = session
//!     .validate_parameters("noop", Some("dev"), &spec, Map::new())
//!     .unwrap();
//! assert!(validated.params.is_empty());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod error;
mod session;
mod tag;

// Re-exports
pub use config::AppSpecConfig;
pub use error::{AppError, AppResult};
pub use session::AppSession;
pub use tag::{check_tag, InvalidTag, ReleaseTag};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running apps
    pub use crate::{AppError, AppResult, AppSession, AppSpecConfig, ReleaseTag};
    pub use appspec_mapping::{ContextSystemVariables, ProcessContext, SystemVariables};
    pub use appspec_model::{AppSpec, MemoryCatalog, ReferenceResolver};
    pub use appspec_validate::{ValidatedParams, ValidationError};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
