//! In-memory object catalog
//!
//! A [`ReferenceResolver`] and [`WorkspaceLookup`] backed by a fixed list of
//! objects, for offline spec checks and tests.

use crate::error::{ResolveError, SpecificationError};
use crate::reference::{ObjectInfo, ObjectLookup, ReferenceResolver, WorkspaceLookup};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceEntry {
    /// Numeric id
    pub id: u64,
    /// Name
    pub name: String,
}

/// Fixed set of workspaces and object versions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryCatalog {
    #[serde(default)]
    workspaces: Vec<WorkspaceEntry>,
    #[serde(default)]
    objects: Vec<ObjectInfo>,
}

impl MemoryCatalog {
    /// Create empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a workspace
    #[must_use]
    pub fn with_workspace(mut self, id: u64, name: impl Into<String>) -> Self {
        self.workspaces.push(WorkspaceEntry {
            id,
            name: name.into(),
        });
        self
    }

    /// Add one object version to a known workspace
    ///
    /// Objects whose workspace id is unknown are still stored, with an empty
    /// workspace name.
    #[must_use]
    pub fn with_object(
        mut self,
        workspace_id: u64,
        object_id: u64,
        name: impl Into<String>,
        type_string: impl Into<String>,
        version: u64,
    ) -> Self {
        let workspace = self
            .workspaces
            .iter()
            .find(|w| w.id == workspace_id)
            .map(|w| w.name.clone())
            .unwrap_or_default();
        self.objects.push(ObjectInfo {
            object_id,
            name: name.into(),
            type_string: type_string.into(),
            version,
            workspace_id,
            workspace,
        });
        self
    }

    /// Parse from JSON text
    ///
    /// # Errors
    /// [`SpecificationError::Parse`] on malformed input.
    pub fn from_json_str(text: &str) -> Result<Self, SpecificationError> {
        serde_json::from_str(text).map_err(|e| SpecificationError::parse("JSON", e))
    }

    /// Load from a JSON file
    ///
    /// # Errors
    /// IO or parse failures.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SpecificationError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| SpecificationError::io_error(path, e))?;
        Self::from_json_str(&text)
    }

    /// Number of stored object versions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the catalog holds no objects
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn workspace_matches(&self, info: &ObjectInfo, selector: &str) -> bool {
        match selector.parse::<u64>() {
            Ok(id) => info.workspace_id == id,
            Err(_) => {
                info.workspace == selector
                    || self
                        .workspaces
                        .iter()
                        .any(|w| w.id == info.workspace_id && w.name == selector)
            }
        }
    }

    fn object_matches(info: &ObjectInfo, selector: &str) -> bool {
        match selector.parse::<u64>() {
            Ok(id) => info.object_id == id,
            Err(_) => info.name == selector,
        }
    }

    fn find(
        &self,
        workspace: &str,
        object: &str,
        version: Option<u64>,
    ) -> Option<&ObjectInfo> {
        let mut candidates = self.objects.iter().filter(|info| {
            self.workspace_matches(info, workspace) && Self::object_matches(info, object)
        });
        match version {
            Some(v) => candidates.find(|info| info.version == v),
            None => candidates.max_by_key(|info| info.version),
        }
    }
}

impl ReferenceResolver for MemoryCatalog {
    fn object_info(&self, lookup: &ObjectLookup) -> Result<ObjectInfo, ResolveError> {
        let found = match lookup {
            ObjectLookup::Ref { reference } => {
                let parts: Vec<&str> = reference.split('/').collect();
                match parts.as_slice() {
                    [ws, obj] => self.find(ws, obj, None),
                    [ws, obj, ver] => match ver.parse::<u64>() {
                        Ok(v) => self.find(ws, obj, Some(v)),
                        Err(_) => None,
                    },
                    _ => None,
                }
            }
            ObjectLookup::Named { workspace, name } => self.find(workspace, name, None),
        };
        found
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(lookup.to_string()))
    }
}

impl WorkspaceLookup for MemoryCatalog {
    fn workspace_id(&self, workspace: &str) -> Result<u64, ResolveError> {
        self.workspaces
            .iter()
            .find(|w| w.name == workspace)
            .map(|w| w.id)
            .ok_or_else(|| ResolveError::NotFound(workspace.to_string()))
    }
}
