//! System variables of the running session
//!
//! Output mappings may pull values such as the current workspace name from
//! the execution context. Access goes through [`SystemVariables`] so callers
//! decide where those values come from.

use appspec_model::WorkspaceLookup;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A variable of the execution context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemVariable {
    /// Current workspace name
    Workspace,
    /// Numeric id of the current workspace
    WorkspaceId,
    /// Auth token of the current user
    Token,
    /// Id of the current user
    UserId,
}

impl SystemVariable {
    /// All variables
    pub const ALL: [Self; 4] = [Self::Workspace, Self::WorkspaceId, Self::Token, Self::UserId];

    /// Name as written in specs
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Workspace => "workspace",
            Self::WorkspaceId => "workspace_id",
            Self::Token => "token",
            Self::UserId => "user_id",
        }
    }
}

impl Display for SystemVariable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown system variable name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown system variable: '{0}'")]
pub struct UnknownVariable(pub String);

impl FromStr for SystemVariable {
    type Err = UnknownVariable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == lower)
            .ok_or_else(|| UnknownVariable(s.to_string()))
    }
}

/// Read access to system variables
pub trait SystemVariables: Send + Sync {
    /// Current value, `None` if unavailable
    fn get(&self, var: SystemVariable) -> Option<String>;
}

impl<T: SystemVariables + ?Sized> SystemVariables for &T {
    fn get(&self, var: SystemVariable) -> Option<String> {
        (**self).get(var)
    }
}

/// Workspace name and token of the running process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessContext {
    /// Current workspace name
    pub workspace: Option<String>,
    /// Auth token
    pub token: Option<String>,
}

impl ProcessContext {
    /// Create context from explicit values
    #[must_use]
    pub fn new(workspace: Option<String>, token: Option<String>) -> Self {
        Self { workspace, token }
    }

    /// Read the context from the named environment variables
    #[must_use]
    pub fn from_env(workspace_var: &str, token_var: &str) -> Self {
        Self {
            workspace: std::env::var(workspace_var).ok(),
            token: std::env::var(token_var).ok(),
        }
    }

    /// User id embedded in a `un=<user>|...` token
    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        static USER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^un=(\w+)").expect("valid regex"));
        let token = self.token.as_deref()?;
        USER.captures(token)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }
}

/// [`SystemVariables`] over a [`ProcessContext`] and a workspace lookup
#[derive(Debug, Clone)]
pub struct ContextSystemVariables<L> {
    context: ProcessContext,
    workspaces: L,
}

impl<L: WorkspaceLookup> ContextSystemVariables<L> {
    /// Create accessor
    #[must_use]
    pub fn new(context: ProcessContext, workspaces: L) -> Self {
        Self {
            context,
            workspaces,
        }
    }

    /// The underlying context
    #[inline]
    #[must_use]
    pub fn context(&self) -> &ProcessContext {
        &self.context
    }
}

impl<L: WorkspaceLookup> SystemVariables for ContextSystemVariables<L> {
    fn get(&self, var: SystemVariable) -> Option<String> {
        match var {
            SystemVariable::Workspace => self.context.workspace.clone(),
            SystemVariable::WorkspaceId => {
                let name = self.context.workspace.as_deref()?;
                match self.workspaces.workspace_id(name) {
                    Ok(id) => Some(id.to_string()),
                    Err(e) => {
                        tracing::warn!(workspace = name, error = %e, "workspace id lookup failed");
                        None
                    }
                }
            }
            SystemVariable::Token => self.context.token.clone(),
            SystemVariable::UserId => self.context.user_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appspec_model::MemoryCatalog;

    fn accessor(workspace: Option<&str>, token: Option<&str>) -> ContextSystemVariables<MemoryCatalog> {
        ContextSystemVariables::new(
            ProcessContext::new(workspace.map(String::from), token.map(String::from)),
            MemoryCatalog::new().with_workspace(42, "my_ws"),
        )
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Workspace".parse::<SystemVariable>(), Ok(SystemVariable::Workspace));
        assert_eq!("USER_ID".parse::<SystemVariable>(), Ok(SystemVariable::UserId));
        assert!("home".parse::<SystemVariable>().is_err());
    }

    #[test]
    fn reads_workspace_and_token() {
        let vars = accessor(Some("my_ws"), Some("un=alice|tokenid=1"));
        assert_eq!(vars.get(SystemVariable::Workspace).as_deref(), Some("my_ws"));
        assert_eq!(
            vars.get(SystemVariable::Token).as_deref(),
            Some("un=alice|tokenid=1")
        );
    }

    #[test]
    fn workspace_id_uses_lookup() {
        assert_eq!(
            accessor(Some("my_ws"), None).get(SystemVariable::WorkspaceId).as_deref(),
            Some("42")
        );
        assert_eq!(accessor(Some("other"), None).get(SystemVariable::WorkspaceId), None);
        assert_eq!(accessor(None, None).get(SystemVariable::WorkspaceId), None);
    }

    #[test]
    fn user_id_from_token() {
        assert_eq!(
            accessor(None, Some("un=alice|tokenid=1")).get(SystemVariable::UserId).as_deref(),
            Some("alice")
        );
        assert_eq!(accessor(None, Some("opaque-token")).get(SystemVariable::UserId), None);
        assert_eq!(accessor(None, None).get(SystemVariable::UserId), None);
    }
}
