//! AUTO-PRIV: the original can detect an elevation method but can
//! never actually re-exec the running process as root, so this always
//! resolves to `RequiresManual` with the relaunch command as the prompt.

use voidwave_core::SessionAccessor;

use crate::handler::{AutoFixHandler, FixOutcome};

fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

fn elevation_method() -> Option<&'static str> {
    if which::which("pkexec").is_ok() {
        Some("pkexec")
    } else if which::which("sudo").is_ok() {
        Some("sudo")
    } else {
        None
    }
}

pub struct PrivilegeHandler;

#[async_trait::async_trait]
impl AutoFixHandler for PrivilegeHandler {
    async fn can_fix(&self, _session: &dyn SessionAccessor) -> bool {
        !is_root() && elevation_method().is_some()
    }

    async fn fix(&self, _session: &dyn SessionAccessor) -> FixOutcome {
        if is_root() {
            return FixOutcome::Fixed;
        }
        match elevation_method() {
            Some(method) => FixOutcome::RequiresManual { prompt: format!("re-launch with {method} to gain root") },
            None => FixOutcome::Failed { reason: "no privilege escalation method available".to_string() },
        }
    }

    fn ui_prompt(&self) -> String {
        if is_root() {
            "already running as root".to_string()
        } else {
            match elevation_method() {
                Some(method) => format!("this action requires root privileges. re-launch with {method}?"),
                None => "this action requires root privileges and no elevation method is available".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidwave_core::EmptySession;

    #[tokio::test]
    async fn fix_never_claims_success_without_being_root() {
        if is_root() {
            return;
        }
        let outcome = PrivilegeHandler.fix(&EmptySession).await;
        assert!(!outcome.is_fixed());
    }
}
