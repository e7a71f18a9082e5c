//! Shared closed enums and the session collaborator contract (spec §3, §6).

use serde::{Deserialize, Serialize};

/// Kind of precondition a requirement represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequirementKind {
    Tool,
    Privilege,
    Interface,
    Data,
    Input,
    ApiKey,
    Hardware,
}

/// Derived status of a requirement after evaluation (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementStatus {
    Met,
    Fixable,
    Manual,
    Missing,
}

/// Outcome of an external tool invocation, the sole contract the chain
/// executor depends on (spec §6, "Tool-registry collaborator contract").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub success: bool,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ToolOutcome {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data,
            errors: Vec::new(),
        }
    }

    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: serde_json::Value::Null,
            errors,
        }
    }
}

/// Narrow read-only accessor over the session state the host process owns.
///
/// The core never constructs or mutates a session; it only reads the
/// handful of optional attributes that drive session-scoped preflight
/// checks (spec §6, "Session collaborator contract").
pub trait SessionAccessor: Send + Sync {
    fn selected_interface(&self) -> Option<&str>;
    fn monitor_interface(&self) -> Option<&str>;
    fn selected_target(&self) -> Option<&str>;
    fn capture_file(&self) -> Option<&str>;
    fn hash_file(&self) -> Option<&str>;
    fn handshake_file(&self) -> Option<&str>;
}

/// A session accessor with nothing set; useful for action types that have
/// no session-scoped requirements, and as a default in tests.
#[derive(Debug, Default, Clone)]
pub struct EmptySession;

impl SessionAccessor for EmptySession {
    fn selected_interface(&self) -> Option<&str> {
        None
    }
    fn monitor_interface(&self) -> Option<&str> {
        None
    }
    fn selected_target(&self) -> Option<&str> {
        None
    }
    fn capture_file(&self) -> Option<&str> {
        None
    }
    fn hash_file(&self) -> Option<&str> {
        None
    }
    fn handshake_file(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_outcome_ok_has_no_errors() {
        let outcome = ToolOutcome::ok(serde_json::json!({"hosts": []}));
        assert!(outcome.success);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn tool_outcome_failed_has_null_data() {
        let outcome = ToolOutcome::failed(vec!["boom".into()]);
        assert!(!outcome.success);
        assert_eq!(outcome.data, serde_json::Value::Null);
    }

    #[test]
    fn empty_session_has_no_attributes() {
        let session = EmptySession;
        assert!(session.selected_interface().is_none());
        assert!(session.selected_target().is_none());
    }
}
