//! Checks an action's requirements and attempts to fix whatever is
//! fixable, composing [`voidwave_requirements`] with
//! [`voidwave_autofix`] the way the original's `PreflightChecker`
//! composes `ATTACK_REQUIREMENTS` with `AUTO_REGISTRY`.

use voidwave_autofix::FixContext;
use voidwave_core::SessionAccessor;
use voidwave_requirements::{requirements_for, Requirement};

use crate::result::PreflightResult;

pub struct PreflightChecker<'a> {
    session: &'a dyn SessionAccessor,
}

impl<'a> PreflightChecker<'a> {
    pub fn new(session: &'a dyn SessionAccessor) -> Self {
        Self { session }
    }

    /// Check every requirement registered for `action`, sorting each
    /// into met / fixable / manual / missing.
    pub fn check(&self, action: &str) -> PreflightResult {
        let requirements = requirements_for(action);
        let mut result = PreflightResult::new(action, requirements.clone());

        for req in requirements {
            match self.status(&req) {
                Status::Met => {}
                Status::Fixable => {
                    result.fixable.push(req);
                    result.all_met = false;
                }
                Status::Manual => {
                    result.manual.push(req);
                    result.all_met = false;
                }
                Status::Missing => {
                    result.missing.push(req);
                    result.all_met = false;
                }
            }
        }

        result
    }

    fn status(&self, req: &Requirement) -> Status {
        if (req.check)(self.session) {
            return Status::Met;
        }
        if req.alternatives.iter().any(|alt| which::which(alt).is_ok()) {
            return Status::Met;
        }
        if (!req.auto_label.is_empty() && voidwave_autofix::is_registered(&req.auto_label)) || req.fix.is_some() {
            return Status::Fixable;
        }
        Status::Manual
    }

    /// Attempt to fix every requirement in `result.fixable`, trying the
    /// `AUTO-*` handler before the requirement's own `fix` closure.
    pub async fn fix_all(&self, result: &mut PreflightResult) {
        let mut still_fixable = Vec::new();

        for req in result.fixable.drain(..).collect::<Vec<_>>() {
            if self.try_fix(&req).await {
                continue;
            }
            still_fixable.push(req);
        }

        result.fixable = still_fixable;
        result.all_met = result.missing.is_empty() && result.fixable.is_empty() && result.manual.is_empty();
    }

    async fn try_fix(&self, req: &Requirement) -> bool {
        if !req.auto_label.is_empty() {
            let ctx = context_for(req);
            let outcome = voidwave_autofix::dispatch(&req.auto_label, &ctx, self.session).await;
            if outcome.is_fixed() {
                return true;
            }
        }

        if let Some(fix) = &req.fix {
            return fix(self.session);
        }

        false
    }
}

enum Status {
    Met,
    Fixable,
    Manual,
    Missing,
}

/// Derives a [`FixContext`] from a requirement's own name, the way the
/// original threads a requirement's attributes into the handler class
/// it constructs for a given `auto_label`.
fn context_for(req: &Requirement) -> FixContext {
    match req.auto_label.as_str() {
        "AUTO-INSTALL" => FixContext::for_tool(req.name.clone()),
        "AUTO-IFACE" | "AUTO-MON" => FixContext::for_interface(req.name.clone()),
        "AUTO-ACQUIRE" => FixContext { input_type: Some(req.name.clone()), ..Default::default() },
        "AUTO-DATA" => FixContext { data_type: Some(req.name.clone()), ..Default::default() },
        "AUTO-KEYS" => FixContext { service: Some(req.name.clone()), ..Default::default() },
        "AUTO-SETUP" => FixContext { setup_type: Some(req.name.clone()), ..Default::default() },
        "AUTO-FALLBACK" => FixContext { primary_tool: Some(req.name.clone()), ..Default::default() },
        "AUTO-GUIDE" => FixContext { guide_type: Some(req.name.clone()), ..Default::default() },
        "AUTO-UPDATE" => FixContext { update_source: Some(req.name.clone()), ..Default::default() },
        _ => FixContext::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidwave_core::EmptySession;

    #[test]
    fn unknown_action_has_no_requirements_and_is_met() {
        let checker = PreflightChecker::new(&EmptySession);
        let result = checker.check("not-a-real-action");
        assert!(result.all_met);
        assert!(result.requirements.is_empty());
    }

    #[test]
    fn scan_quick_is_fixable_without_a_target() {
        let checker = PreflightChecker::new(&EmptySession);
        let result = checker.check("scan_quick");
        assert!(!result.all_met);
        // nmap resolves via `which` (met or fixable); target is never set
        // on an EmptySession, so it always lands in missing or fixable.
        assert!(!result.missing.is_empty() || !result.fixable.is_empty());
    }

    #[tokio::test]
    async fn fix_all_cannot_auto_fix_the_target_requirement() {
        let checker = PreflightChecker::new(&EmptySession);
        let mut result = checker.check("scan_quick");
        checker.fix_all(&mut result).await;
        // AUTO-ACQUIRE always requires manual interaction, so the target
        // requirement stays fixable-but-unfixed rather than clearing.
        assert!(!result.all_met);
        assert!(result.fixable.iter().any(|r| r.name == "target"));
    }
}
