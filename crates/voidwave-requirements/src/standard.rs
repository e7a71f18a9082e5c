//! Standard requirement builders ported from the original's
//! `ROOT_REQ`/`INTERFACE_REQ`/`MONITOR_REQ`/`TARGET_REQ`/`WORDLIST_REQ`
//! constants and `tool_req()` factory.

use directories::BaseDirs;
use voidwave_core::RequirementKind;

use crate::requirement::Requirement;

fn is_root() -> bool {
    // SAFETY: geteuid takes no arguments and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

pub fn root_requirement() -> Requirement {
    Requirement::new(
        RequirementKind::Privilege,
        "root",
        "Root privileges required",
        |_session| is_root(),
    )
    .with_auto_label("AUTO-PRIV")
}

pub fn interface_requirement() -> Requirement {
    Requirement::new(
        RequirementKind::Interface,
        "interface",
        "Wireless interface selected",
        |session| session.selected_interface().is_some(),
    )
    .with_auto_label("AUTO-IFACE")
}

pub fn monitor_requirement() -> Requirement {
    Requirement::new(
        RequirementKind::Interface,
        "monitor_mode",
        "Monitor mode enabled",
        |session| session.monitor_interface().is_some(),
    )
    .with_auto_label("AUTO-MON")
}

pub fn target_requirement() -> Requirement {
    Requirement::new(
        RequirementKind::Input,
        "target",
        "Target network/host selected",
        |session| session.selected_target().is_some(),
    )
    .with_auto_label("AUTO-ACQUIRE")
}

pub fn capture_file_requirement() -> Requirement {
    Requirement::new(
        RequirementKind::Input,
        "capture_file",
        "Capture file exists",
        |session| session.capture_file().is_some(),
    )
    .with_auto_label("AUTO-ACQUIRE")
}

pub fn hash_file_requirement() -> Requirement {
    Requirement::new(
        RequirementKind::Input,
        "hash_file",
        "Hash file exists",
        |session| session.hash_file().is_some(),
    )
    .with_auto_label("AUTO-ACQUIRE")
}

pub fn handshake_requirement() -> Requirement {
    Requirement::new(
        RequirementKind::Input,
        "handshake",
        "Handshake captured",
        |session| session.handshake_file().is_some(),
    )
    .with_auto_label("AUTO-ACQUIRE")
}

fn wordlist_candidates() -> Vec<std::path::PathBuf> {
    let mut paths = vec![
        "/usr/share/wordlists/rockyou.txt".into(),
        "/usr/share/seclists/Passwords/rockyou.txt".into(),
        "/voidwave/wordlists/rockyou.txt".into(),
    ];
    if let Some(dirs) = BaseDirs::new() {
        paths.push(dirs.home_dir().join(".voidwave/wordlists/rockyou.txt"));
    }
    paths
}

pub fn wordlist_requirement() -> Requirement {
    Requirement::new(
        RequirementKind::Data,
        "wordlist",
        "Wordlist file available",
        |_session| wordlist_candidates().iter().any(|p| p.exists()),
    )
    .with_auto_label("AUTO-DATA")
}

/// Build a tool requirement, resolved against `PATH` via `which`.
pub fn tool_requirement(
    name: impl Into<String>,
    description: impl Into<String>,
    alternatives: Vec<String>,
) -> Requirement {
    let name = name.into();
    let check_name = name.clone();
    let description = {
        let d = description.into();
        if d.is_empty() {
            format!("{name} tool required")
        } else {
            d
        }
    };
    Requirement::new(RequirementKind::Tool, name, description, move |_session| {
        which::which(&check_name).is_ok()
    })
    .with_alternatives(alternatives)
    .with_auto_label("AUTO-INSTALL")
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidwave_core::EmptySession;

    #[test]
    fn root_requirement_checks_euid() {
        let req = root_requirement();
        let met = (req.check)(&EmptySession);
        assert_eq!(met, is_root());
    }

    #[test]
    fn interface_requirement_fails_without_session_state() {
        let req = interface_requirement();
        assert!(!(req.check)(&EmptySession));
    }

    #[test]
    fn tool_requirement_falls_back_to_default_description() {
        let req = tool_requirement("nmap", "", vec!["masscan".into()]);
        assert_eq!(req.description, "nmap tool required");
        assert_eq!(req.alternatives, vec!["masscan".to_string()]);
        assert_eq!(req.auto_label, "AUTO-INSTALL");
    }

    #[test]
    fn tool_requirement_checks_path_for_a_known_binary() {
        let req = tool_requirement("sh", "", vec![]);
        assert!((req.check)(&EmptySession));
    }

    #[test]
    fn tool_requirement_rejects_unknown_binary() {
        let req = tool_requirement("definitely-not-a-real-binary-xyz", "", vec![]);
        assert!(!(req.check)(&EmptySession));
    }
}
