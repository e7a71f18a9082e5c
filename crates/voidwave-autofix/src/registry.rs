//! Dispatches a failing requirement's `auto_label` to the matching
//! handler and runs it. A closed match plays the role of the
//! original's `AUTO_REGISTRY.get(label)(**kwargs)` dynamic lookup.
//!
//! `AUTO-CLEANUP` is not dispatched here: cleanup actions accumulate
//! as a chain runs (see [`crate::handlers::cleanup::CleanupStack`]), so
//! the caller owns that stack directly instead of constructing it
//! fresh per fix attempt.

use voidwave_core::SessionAccessor;

use crate::context::FixContext;
use crate::handler::{AutoFixHandler, FixOutcome};
use crate::handlers::{acquire, data, fallback, guide, iface, install, keys, monitor, privilege, setup, update, validate};

/// Whether `auto_label` names a handler `dispatch` actually runs,
/// mirroring the original's `AUTO_REGISTRY.get(label)` membership
/// check. `AUTO-CLEANUP` is not registered here for the same reason
/// `dispatch` doesn't handle it.
pub fn is_registered(auto_label: &str) -> bool {
    matches!(
        auto_label,
        "AUTO-INSTALL"
            | "AUTO-PRIV"
            | "AUTO-MON"
            | "AUTO-IFACE"
            | "AUTO-ACQUIRE"
            | "AUTO-DATA"
            | "AUTO-KEYS"
            | "AUTO-SETUP"
            | "AUTO-FALLBACK"
            | "AUTO-GUIDE"
            | "AUTO-VALIDATE"
            | "AUTO-UPDATE"
    )
}

pub async fn dispatch(auto_label: &str, ctx: &FixContext, session: &dyn SessionAccessor) -> FixOutcome {
    match auto_label {
        "AUTO-INSTALL" => {
            let handler = install::InstallHandler { tool_name: ctx.tool_name.clone().unwrap_or_default() };
            handler.fix(session).await
        }
        "AUTO-PRIV" => privilege::PrivilegeHandler.fix(session).await,
        "AUTO-MON" => monitor::MonitorHandler { interface: ctx.interface.clone() }.fix(session).await,
        "AUTO-IFACE" => {
            let handler = iface::IfaceHandler::new(ctx.interface.clone().unwrap_or_else(|| "wireless".to_string()));
            handler.fix(session).await
        }
        "AUTO-ACQUIRE" => acquire::AcquireHandler { input_type: ctx.input_type.clone().unwrap_or_default() }.fix(session).await,
        "AUTO-DATA" => data::DataHandler { data_type: ctx.data_type.clone().unwrap_or_default() }.fix(session).await,
        "AUTO-KEYS" => keys::KeysHandler { service: ctx.service.clone().unwrap_or_default() }.fix(session).await,
        "AUTO-SETUP" => setup::SetupHandler { setup_type: ctx.setup_type.clone().unwrap_or_default() }.fix(session).await,
        "AUTO-FALLBACK" => fallback::FallbackHandler::new(ctx.primary_tool.clone().unwrap_or_default()).fix(session).await,
        "AUTO-GUIDE" => guide::GuideHandler { guide_type: ctx.guide_type.clone().unwrap_or_default() }.fix(session).await,
        "AUTO-VALIDATE" => {
            validate::ValidateHandler {
                input_type: ctx.input_type.clone().unwrap_or_default(),
                value: ctx.validate_value.clone().unwrap_or_default(),
            }
            .fix(session)
            .await
        }
        "AUTO-UPDATE" => update::UpdateHandler { source: ctx.update_source.clone().unwrap_or_default() }.fix(session).await,
        other => FixOutcome::Failed { reason: format!("no handler registered for '{other}'") },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidwave_core::EmptySession;

    #[tokio::test]
    async fn unknown_label_fails_cleanly() {
        let outcome = dispatch("AUTO-NONSENSE", &FixContext::default(), &EmptySession).await;
        assert!(matches!(outcome, FixOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn acquire_always_requires_manual_action() {
        let ctx = FixContext { input_type: Some("wordlist".to_string()), ..Default::default() };
        let outcome = dispatch("AUTO-ACQUIRE", &ctx, &EmptySession).await;
        assert!(matches!(outcome, FixOutcome::RequiresManual { .. }));
    }

    #[test]
    fn cleanup_label_is_not_registered() {
        assert!(!is_registered("AUTO-CLEANUP"));
        assert!(is_registered("AUTO-INSTALL"));
        assert!(!is_registered("AUTO-NONSENSE"));
    }
}
