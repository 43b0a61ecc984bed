//! appspec Mapping
//!
//! Moves values between the logical parameters of an app spec and the data a
//! job actually sees.
//!
//! # Overview
//!
//! - [`resolve`]: walk a nested job result by string path
//! - [`map_inputs`]: rebuild named parameters from positional job inputs
//! - [`OutputMapper`]: turn a job result into widget name and parameters
//! - [`SystemVariables`]: read-only access to the execution context
//!
//! # Example
//!
//! ```rust
//! use appspec_mapping::{map_inputs, resolve_owned};
//! use appspec_model::InputMappingEntry;
//! use serde_json::json;
//!
//! let result = json!([{"report_ref": "1/2/3"}]);
//! assert_eq!(resolve_owned(&result, &["0", "report_ref"]), json!("1/2/3"));
//!
//! let mapping = vec![InputMappingEntry::new(0, "genome").with_transform("ref")];
//! let named = map_inputs(&[json!("my_ws/g1")], &mapping).unwrap();
//! assert_eq!(named["genome"], json!("g1"));
//! ```

#![warn(missing_docs)]

pub mod input;
pub mod output;
pub mod path;
pub mod system;
pub mod transform;

// Re-exports
pub use input::{map_inputs, map_inputs_from_job};
pub use output::{OutputMapper, WidgetOutput, DEFAULT_OUTPUT_WIDGET};
pub use path::{resolve, resolve_owned, Shape};
pub use system::{
    ContextSystemVariables, ProcessContext, SystemVariable, SystemVariables, UnknownVariable,
};
pub use transform::Transform;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for mapping operations
    pub use crate::{
        map_inputs, map_inputs_from_job, resolve, resolve_owned, OutputMapper, SystemVariable,
        SystemVariables, Transform, WidgetOutput,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
