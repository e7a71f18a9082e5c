//! AUTO-INSTALL: resolve a tool name to a distro package and invoke
//! the system package manager. `PACKAGE_MAP` is a representative
//! subset of the original's ~40-tool table (spec's Non-goals note
//! that exhaustive tool coverage isn't required).

use std::path::Path;

use tokio::process::Command;

use voidwave_core::SessionAccessor;

use crate::handler::{AutoFixHandler, FixOutcome};

pub const PACKAGE_MAP: &[(&str, &[(&str, &str)])] = &[
    ("nmap", &[("debian", "nmap"), ("arch", "nmap"), ("fedora", "nmap")]),
    ("masscan", &[("debian", "masscan"), ("arch", "masscan"), ("fedora", "masscan")]),
    ("hashcat", &[("debian", "hashcat"), ("arch", "hashcat"), ("fedora", "hashcat")]),
    ("john", &[("debian", "john"), ("arch", "john"), ("fedora", "john")]),
    ("hydra", &[("debian", "hydra"), ("arch", "hydra"), ("fedora", "hydra")]),
    ("gobuster", &[("debian", "gobuster"), ("arch", "gobuster"), ("fedora", "gobuster")]),
    ("subfinder", &[("debian", "subfinder"), ("arch", "subfinder"), ("fedora", "subfinder")]),
    ("aircrack-ng", &[("debian", "aircrack-ng"), ("arch", "aircrack-ng"), ("fedora", "aircrack-ng")]),
    ("airodump-ng", &[("debian", "aircrack-ng"), ("arch", "aircrack-ng"), ("fedora", "aircrack-ng")]),
    ("whatweb", &[("debian", "whatweb"), ("arch", "whatweb"), ("fedora", "whatweb")]),
    ("sqlmap", &[("debian", "sqlmap"), ("arch", "sqlmap"), ("fedora", "sqlmap")]),
    ("nikto", &[("debian", "nikto"), ("arch", "nikto"), ("fedora", "nikto")]),
    ("pixiewps", &[("debian", "pixiewps"), ("arch", "pixiewps"), ("fedora", "pixiewps")]),
    ("whois", &[("debian", "whois"), ("arch", "whois"), ("fedora", "whois")]),
    ("dig", &[("debian", "dnsutils"), ("arch", "bind-tools"), ("fedora", "bind-utils")]),
];

pub fn detect_distro() -> &'static str {
    let Ok(content) = std::fs::read_to_string("/etc/os-release") else {
        return "debian";
    };
    let lower = content.to_lowercase();
    if lower.contains("arch") || lower.contains("manjaro") {
        "arch"
    } else if lower.contains("fedora") || lower.contains("rhel") || lower.contains("centos") {
        "fedora"
    } else {
        "debian"
    }
}

pub fn package_manager() -> Option<&'static str> {
    for pm in ["apt", "dnf", "pacman", "zypper", "apk"] {
        if which::which(pm).is_ok() {
            return Some(pm);
        }
    }
    None
}

fn package_name(tool_name: &str, distro: &str) -> String {
    PACKAGE_MAP
        .iter()
        .find(|(name, _)| *name == tool_name)
        .and_then(|(_, map)| map.iter().find(|(d, _)| *d == distro).map(|(_, pkg)| pkg.to_string()))
        .unwrap_or_else(|| tool_name.to_string())
}

fn install_argv(pm: &str, package: &str) -> Vec<String> {
    match pm {
        "apt" => vec!["apt-get".into(), "install".into(), "-y".into(), package.into()],
        "dnf" => vec!["dnf".into(), "install".into(), "-y".into(), package.into()],
        "pacman" => vec!["pacman".into(), "-S".into(), "--noconfirm".into(), package.into()],
        "zypper" => vec!["zypper".into(), "install".into(), "-y".into(), package.into()],
        "apk" => vec!["apk".into(), "add".into(), package.into()],
        _ => vec![pm.into(), package.into()],
    }
}

pub struct InstallHandler {
    pub tool_name: String,
}

#[async_trait::async_trait]
impl AutoFixHandler for InstallHandler {
    async fn can_fix(&self, _session: &dyn SessionAccessor) -> bool {
        package_manager().is_some() && !self.tool_name.is_empty()
    }

    async fn fix(&self, _session: &dyn SessionAccessor) -> FixOutcome {
        let Some(pm) = package_manager() else {
            return FixOutcome::Failed { reason: "no supported package manager found".to_string() };
        };
        let package = package_name(&self.tool_name, detect_distro());
        let argv = install_argv(pm, &package);

        let status = Command::new(&argv[0]).args(&argv[1..]).status().await;
        match status {
            Ok(status) if status.success() && tool_on_path(&self.tool_name) => FixOutcome::Fixed,
            Ok(status) => FixOutcome::Failed { reason: format!("{pm} exited with {status}") },
            Err(e) => FixOutcome::Failed { reason: e.to_string() },
        }
    }

    fn ui_prompt(&self) -> String {
        format!("Install '{}' using {}?", self.tool_name, package_manager().unwrap_or("a package manager"))
    }
}

fn tool_on_path(name: &str) -> bool {
    which::which(name).is_ok() || Path::new(name).exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_tool_to_distro_package() {
        assert_eq!(package_name("airodump-ng", "debian"), "aircrack-ng");
        assert_eq!(package_name("dig", "fedora"), "bind-utils");
    }

    #[test]
    fn unknown_tool_falls_back_to_its_own_name() {
        assert_eq!(package_name("some-obscure-tool", "debian"), "some-obscure-tool");
    }

    #[test]
    fn install_argv_matches_package_manager_syntax() {
        assert_eq!(install_argv("pacman", "nmap"), vec!["pacman", "-S", "--noconfirm", "nmap"]);
        assert_eq!(install_argv("apt", "nmap"), vec!["apt-get", "install", "-y", "nmap"]);
    }
}
