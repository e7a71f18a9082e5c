use std::fmt;
use std::sync::Arc;

use voidwave_core::{RequirementKind, SessionAccessor};

/// A single precondition an action needs satisfied before it runs
/// (spec §3, "Requirement").
///
/// `check` and `fix` are session-aware closures rather than the
/// original's module-global lookup table: the session is threaded
/// through explicitly via [`SessionAccessor`].
#[derive(Clone)]
pub struct Requirement {
    pub kind: RequirementKind,
    pub name: String,
    pub description: String,
    pub check: Arc<dyn Fn(&dyn SessionAccessor) -> bool + Send + Sync>,
    pub fix: Option<Arc<dyn Fn(&dyn SessionAccessor) -> bool + Send + Sync>>,
    pub alternatives: Vec<String>,
    pub auto_label: String,
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Requirement")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("has_fix", &self.fix.is_some())
            .field("alternatives", &self.alternatives)
            .field("auto_label", &self.auto_label)
            .finish()
    }
}

impl Requirement {
    pub fn new(
        kind: RequirementKind,
        name: impl Into<String>,
        description: impl Into<String>,
        check: impl Fn(&dyn SessionAccessor) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
            check: Arc::new(check),
            fix: None,
            alternatives: Vec::new(),
            auto_label: String::new(),
        }
    }

    pub fn with_auto_label(mut self, label: impl Into<String>) -> Self {
        self.auto_label = label.into();
        self
    }

    pub fn with_alternatives(mut self, alternatives: Vec<String>) -> Self {
        self.alternatives = alternatives;
        self
    }

    pub fn with_fix(
        mut self,
        fix: impl Fn(&dyn SessionAccessor) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.fix = Some(Arc::new(fix));
        self
    }
}
