//! appspec Validate
//!
//! Checks submitted parameters against an app's declared parameters and
//! normalizes them for execution.
//!
//! # Overview
//!
//! - [`ParameterValidator`]: presence, unknown-key, value and group checks
//! - [`check_value`]: rules for a single value
//! - [`ValidationError`]: what was wrong, per field
//!
//! # Example
//!
//! ```rust
//! use appspec_model::{MemoryCatalog, ParamType, ParameterSpec, ParameterSpecs};
//! use appspec_validate::{ParameterValidator, ValidationContext};
//! use serde_json::json;
//!
//! let specs = ParameterSpecs::new(vec![
//!     ParameterSpec::new("k", ParamType::Int).optional().with_default(21),
//! ])
//! .unwrap();
//! let catalog = MemoryCatalog::new();
//! let params = serde_json::Map::new();
//!
//! let validated = ParameterValidator::new(&catalog)
//!     .validate(&specs, params, &ValidationContext::new("my_ws"))
//!     .unwrap();
//! assert_eq!(validated.params["k"], json!(21));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod group;
mod validator;
pub mod value;

// Re-exports
pub use error::{AppLabel, ParameterError, ValidateError, ValidationError};
pub use validator::{check_submission, ParameterValidator, ValidatedParams, ValidationContext};
pub use value::{check_value, output_name_error, ValueCheck};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for validation
    pub use crate::{
        ParameterValidator, ValidatedParams, ValidateError, ValidationContext, ValidationError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
