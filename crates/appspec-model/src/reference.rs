//! Object references and the object store collaborator
//!
//! An [`ObjectRef`] is the canonical `workspaceId/objectId/version` triple of a
//! versioned object in an external store. The store itself sits behind
//! [`ReferenceResolver`] and [`WorkspaceLookup`], which callers construct and
//! pass in explicitly.

use crate::error::ResolveError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Canonical reference to one version of a stored object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    /// Numeric workspace id
    pub workspace_id: u64,
    /// Numeric object id within the workspace
    pub object_id: u64,
    /// Object version
    pub version: u64,
}

impl ObjectRef {
    /// Create new reference
    #[inline]
    #[must_use]
    pub fn new(workspace_id: u64, object_id: u64, version: u64) -> Self {
        Self {
            workspace_id,
            object_id,
            version,
        }
    }
}

impl Display for ObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.workspace_id, self.object_id, self.version)
    }
}

/// Error parsing a canonical reference
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid object reference '{0}': expected workspaceId/objectId/version")]
pub struct ParseRefError(String);

impl FromStr for ObjectRef {
    type Err = ParseRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        let [ws, obj, ver] = parts.as_slice() else {
            return Err(ParseRefError(s.to_string()));
        };
        let parse = |p: &str| p.parse::<u64>().map_err(|_| ParseRefError(s.to_string()));
        Ok(Self::new(parse(*ws)?, parse(*obj)?, parse(*ver)?))
    }
}

impl Serialize for ObjectRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// How to find an object in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectLookup {
    /// Explicit `ws/obj[/ver]` reference, ids or names
    Ref {
        /// The reference text
        #[serde(rename = "ref")]
        reference: String,
    },
    /// Object name scoped to a workspace
    Named {
        /// Workspace name
        workspace: String,
        /// Object name
        name: String,
    },
}

impl ObjectLookup {
    /// Lookup by explicit reference
    #[inline]
    pub fn by_ref(reference: impl Into<String>) -> Self {
        Self::Ref {
            reference: reference.into(),
        }
    }

    /// Lookup by name within a workspace
    #[inline]
    pub fn by_name(workspace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named {
            workspace: workspace.into(),
            name: name.into(),
        }
    }
}

impl Display for ObjectLookup {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ref { reference } => f.write_str(reference),
            Self::Named { workspace, name } => write!(f, "{workspace}/{name}"),
        }
    }
}

/// Descriptor of a stored object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Numeric object id
    pub object_id: u64,
    /// Object name
    pub name: String,
    /// Concrete type, e.g. `KBaseGenomes.Genome-8.2`
    pub type_string: String,
    /// Object version
    pub version: u64,
    /// Numeric workspace id
    pub workspace_id: u64,
    /// Workspace name
    pub workspace: String,
}

impl ObjectInfo {
    /// Canonical reference for this object version
    #[inline]
    #[must_use]
    pub fn reference(&self) -> ObjectRef {
        ObjectRef::new(self.workspace_id, self.object_id, self.version)
    }
}

/// Resolves object lookups against an external store
///
/// Implementations own any retry, timeout or caching policy.
pub trait ReferenceResolver: Send + Sync {
    /// Fetch the descriptor of the object a lookup designates
    ///
    /// # Errors
    /// [`ResolveError::NotFound`] when nothing matches,
    /// [`ResolveError::Unavailable`] when the store cannot answer.
    fn object_info(&self, lookup: &ObjectLookup) -> Result<ObjectInfo, ResolveError>;
}

/// Maps workspace names to numeric ids
pub trait WorkspaceLookup: Send + Sync {
    /// Numeric id of the named workspace
    ///
    /// # Errors
    /// [`ResolveError::NotFound`] for unknown workspaces.
    fn workspace_id(&self, workspace: &str) -> Result<u64, ResolveError>;
}

impl<T: ReferenceResolver + ?Sized> ReferenceResolver for &T {
    fn object_info(&self, lookup: &ObjectLookup) -> Result<ObjectInfo, ResolveError> {
        (**self).object_info(lookup)
    }
}

impl<T: WorkspaceLookup + ?Sized> WorkspaceLookup for &T {
    fn workspace_id(&self, workspace: &str) -> Result<u64, ResolveError> {
        (**self).workspace_id(workspace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn displays_canonical_form() {
        assert_eq!(ObjectRef::new(11, 22, 3).to_string(), "11/22/3");
    }

    #[test]
    fn parses_canonical_form() {
        let r: ObjectRef = "11/22/3".parse().unwrap();
        assert_eq!(r, ObjectRef::new(11, 22, 3));
        assert!("11/22".parse::<ObjectRef>().is_err());
        assert!("a/b/c".parse::<ObjectRef>().is_err());
        assert!("1/2/3/4".parse::<ObjectRef>().is_err());
    }

    #[test]
    fn serializes_as_string() {
        let r = ObjectRef::new(1, 2, 3);
        assert_eq!(serde_json::to_value(r).unwrap(), json!("1/2/3"));
        let back: ObjectRef = serde_json::from_value(json!("1/2/3")).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn lookup_wire_shapes() {
        assert_eq!(
            serde_json::to_value(ObjectLookup::by_ref("1/2/3")).unwrap(),
            json!({"ref": "1/2/3"})
        );
        assert_eq!(
            serde_json::to_value(ObjectLookup::by_name("ws", "genome")).unwrap(),
            json!({"workspace": "ws", "name": "genome"})
        );
    }

    #[test]
    fn info_builds_reference() {
        let info = ObjectInfo {
            object_id: 22,
            name: "genome".to_string(),
            type_string: "KBaseGenomes.Genome-8.2".to_string(),
            version: 3,
            workspace_id: 11,
            workspace: "ws".to_string(),
        };
        assert_eq!(info.reference().to_string(), "11/22/3");
    }
}
