//! AUTO-MON: put a wireless interface into monitor mode, preferring
//! `airmon-ng` and falling back to `iw`/`ip link`.

use std::path::Path;

use tokio::process::Command;

use voidwave_core::SessionAccessor;

use crate::handler::{AutoFixHandler, FixOutcome};

pub fn wireless_interfaces() -> Vec<String> {
    let mut interfaces = Vec::new();
    let Ok(entries) = std::fs::read_dir("/sys/class/net") else {
        return interfaces;
    };
    for entry in entries.flatten() {
        if entry.path().join("wireless").exists() {
            if let Some(name) = entry.file_name().to_str() {
                interfaces.push(name.to_string());
            }
        }
    }
    interfaces
}

async fn run(shell_cmd: &str) -> bool {
    Command::new("sh").arg("-c").arg(shell_cmd).status().await.map(|s| s.success()).unwrap_or(false)
}

pub struct MonitorHandler {
    pub interface: Option<String>,
}

impl MonitorHandler {
    fn target_interface(&self) -> Option<String> {
        self.interface.clone().or_else(|| wireless_interfaces().into_iter().next())
    }
}

#[async_trait::async_trait]
impl AutoFixHandler for MonitorHandler {
    async fn can_fix(&self, _session: &dyn SessionAccessor) -> bool {
        let has_tool = which::which("airmon-ng").is_ok() || which::which("iw").is_ok();
        has_tool && self.target_interface().is_some()
    }

    async fn fix(&self, _session: &dyn SessionAccessor) -> FixOutcome {
        let Some(interface) = self.target_interface() else {
            return FixOutcome::Failed { reason: "no wireless interface available".to_string() };
        };

        if which::which("airmon-ng").is_ok() {
            run("airmon-ng check kill").await;
            run(&format!("airmon-ng start {interface}")).await;
            let monitor_name = format!("{interface}mon");
            if Path::new(&format!("/sys/class/net/{monitor_name}")).exists() {
                return FixOutcome::Fixed;
            }
            if Path::new(&format!("/sys/class/net/{interface}")).exists() {
                return FixOutcome::Fixed;
            }
            return FixOutcome::Failed { reason: "airmon-ng did not produce a monitor interface".to_string() };
        }

        if which::which("iw").is_ok() {
            run(&format!("ip link set {interface} down")).await;
            let ok = run(&format!("iw dev {interface} set type monitor")).await;
            run(&format!("ip link set {interface} up")).await;
            return if ok {
                FixOutcome::Fixed
            } else {
                FixOutcome::Failed { reason: format!("iw failed to set {interface} to monitor mode") }
            };
        }

        FixOutcome::Failed { reason: "neither airmon-ng nor iw is available".to_string() }
    }

    fn ui_prompt(&self) -> String {
        match self.target_interface() {
            Some(iface) => format!("enable monitor mode on {iface}?"),
            None => "enable monitor mode on a wireless interface?".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wireless_interfaces_only_lists_entries_with_a_wireless_subdir() {
        let interfaces = wireless_interfaces();
        assert!(interfaces.iter().all(|i| Path::new(&format!("/sys/class/net/{i}/wireless")).exists()));
    }
}
