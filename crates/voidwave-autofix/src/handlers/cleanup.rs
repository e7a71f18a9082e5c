//! AUTO-CLEANUP: restore system state mutated by an operation (monitor
//! mode, iptables rules, hostapd/dnsmasq services, …).
//!
//! The original keeps a class-level mutable stack shared across every
//! instance; we replace that global with a `CleanupStack` the caller
//! owns and pushes actions onto as it mutates system state, which is
//! then drained through the `AutoFixHandler` contract. Actions are a
//! closed enum rather than boxed closures, keeping the stack
//! `Send + Sync` without extra trait-object plumbing.

use std::sync::Mutex;

use tokio::process::Command;

use voidwave_core::SessionAccessor;

use crate::handler::{AutoFixHandler, FixOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupAction {
    RestoreNetworkManager,
    RestoreManagedMode { interface: String },
    DisableIpForwarding,
    FlushIptables,
    StopHostapd,
    StopDnsmasq,
}

impl CleanupAction {
    /// Higher runs first, matching the original's priority ordering.
    fn priority(&self) -> i32 {
        match self {
            CleanupAction::StopHostapd | CleanupAction::StopDnsmasq => 20,
            CleanupAction::FlushIptables | CleanupAction::DisableIpForwarding => 10,
            CleanupAction::RestoreManagedMode { .. } => 5,
            CleanupAction::RestoreNetworkManager => 0,
        }
    }

    async fn run(&self) -> bool {
        match self {
            CleanupAction::RestoreNetworkManager => shell("systemctl start NetworkManager").await,
            CleanupAction::RestoreManagedMode { interface } => {
                shell(&format!("ip link set {interface} down")).await;
                shell(&format!("iw dev {interface} set type managed")).await;
                shell(&format!("ip link set {interface} up")).await
            }
            CleanupAction::DisableIpForwarding => shell("sysctl -w net.ipv4.ip_forward=0").await,
            CleanupAction::FlushIptables => {
                shell("iptables -F").await;
                shell("iptables -t nat -F").await;
                shell("iptables -t mangle -F").await
            }
            CleanupAction::StopHostapd => shell("killall hostapd").await,
            CleanupAction::StopDnsmasq => shell("killall dnsmasq").await,
        }
    }
}

async fn shell(cmd: &str) -> bool {
    Command::new("sh").arg("-c").arg(cmd).status().await.map(|s| s.success()).unwrap_or(false)
}

#[derive(Default)]
pub struct CleanupStack {
    actions: Mutex<Vec<CleanupAction>>,
}

impl CleanupStack {
    pub fn push(&self, action: CleanupAction) {
        self.actions.lock().unwrap().push(action);
    }

    pub fn pending(&self) -> Vec<CleanupAction> {
        self.actions.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.actions.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl AutoFixHandler for CleanupStack {
    async fn can_fix(&self, _session: &dyn SessionAccessor) -> bool {
        !self.actions.lock().unwrap().is_empty()
    }

    async fn fix(&self, _session: &dyn SessionAccessor) -> FixOutcome {
        let mut actions = self.actions.lock().unwrap().split_off(0);
        actions.sort_by_key(|a| std::cmp::Reverse(a.priority()));

        let mut all_ok = true;
        for action in &actions {
            if !action.run().await {
                all_ok = false;
            }
        }

        if all_ok {
            FixOutcome::Fixed
        } else {
            FixOutcome::Failed { reason: "one or more cleanup actions failed".to_string() }
        }
    }

    fn ui_prompt(&self) -> String {
        let count = self.actions.lock().unwrap().len();
        if count == 0 {
            "no cleanup actions pending.".to_string()
        } else {
            format!("perform {count} cleanup action(s)?")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_actions_run_highest_priority_first() {
        let stack = CleanupStack::default();
        stack.push(CleanupAction::RestoreNetworkManager);
        stack.push(CleanupAction::StopHostapd);
        let mut pending = stack.pending();
        pending.sort_by_key(|a| std::cmp::Reverse(a.priority()));
        assert_eq!(pending[0], CleanupAction::StopHostapd);
    }
}
