//! appspec Model
//!
//! Declarative app specs and the types shared by the mapping and validation
//! crates.
//!
//! # Core Concepts
//!
//! - [`AppSpec`]: parameters, input/output wiring and output widget of one app
//! - [`ParameterSpec`] / [`ParameterSpecs`]: declared parameters, checked list
//! - [`ObjectRef`]: canonical `workspaceId/objectId/version` reference
//! - [`ReferenceResolver`] / [`WorkspaceLookup`]: object store collaborators
//! - [`MemoryCatalog`]: in-memory store for offline checks
//!
//! # Example
//!
//! ```rust
//! use appspec_model::{AppSpec, ParamType};
//!
//! let spec = AppSpec::from_json_str(
//!     r#"{"parameters": [{"id": "k", "type": "int", "min_val": 1}]}"#,
//! )
//! .unwrap();
//! let params = spec.parameter_specs().unwrap();
//! assert_eq!(params.get("k").unwrap().spec().param_type, ParamType::Int);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod app;
mod catalog;
mod error;
mod param;
mod pattern;
mod reference;

// Re-exports
pub use app::{AppSpec, Behavior, InputMappingEntry, OutputMappingEntry, OutputSource, Widgets};
pub use catalog::{MemoryCatalog, WorkspaceEntry};
pub use error::{ResolveError, SpecResult, SpecificationError};
pub use param::{ParamType, ParameterRule, ParameterSpec, ParameterSpecs};
pub use pattern::Pattern;
pub use reference::{
    ObjectInfo, ObjectLookup, ObjectRef, ParseRefError, ReferenceResolver, WorkspaceLookup,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
