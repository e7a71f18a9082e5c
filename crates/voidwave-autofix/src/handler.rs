//! The uniform handler contract every AUTO-* fix implements (spec §3,
//! "Requirement → Fix" flow). Grounded on the original's
//! `AUTO_REGISTRY`-dispatched handler classes, each exposing
//! `can_fix`/`fix`/`get_ui_prompt` — collapsed here into one trait
//! since Rust has no dynamic class registry to mirror.

use voidwave_core::SessionAccessor;

/// Result of attempting a fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    /// The fix ran and the requirement is now satisfied.
    Fixed,
    /// The fix cannot run headlessly; the caller must act on `prompt`.
    RequiresManual { prompt: String },
    /// The fix ran but did not satisfy the requirement.
    Failed { reason: String },
}

impl FixOutcome {
    pub fn is_fixed(&self) -> bool {
        matches!(self, FixOutcome::Fixed)
    }
}

#[async_trait::async_trait]
pub trait AutoFixHandler: Send + Sync {
    /// Whether this handler has what it needs to attempt a fix right now.
    async fn can_fix(&self, session: &dyn SessionAccessor) -> bool;

    /// Attempt the fix.
    async fn fix(&self, session: &dyn SessionAccessor) -> FixOutcome;

    /// Human-readable description of what the fix would do, for
    /// confirmation prompts.
    fn ui_prompt(&self) -> String;
}
