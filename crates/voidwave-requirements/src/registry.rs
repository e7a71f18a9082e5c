//! Named action -> requirement-list table, ported from a representative
//! subset of the original's `ATTACK_REQUIREMENTS`. Exhaustive coverage of
//! every action name is not this crate's concern (spec §1 Non-goals);
//! the mechanism — look an action up, get back its requirement list — is
//! what callers depend on.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::requirement::Requirement;
use crate::standard::{
    capture_file_requirement, handshake_requirement, hash_file_requirement,
    interface_requirement, monitor_requirement, root_requirement, target_requirement,
    tool_requirement, wordlist_requirement,
};

fn tool(name: &str, description: &str) -> Requirement {
    tool_requirement(name, description, Vec::new())
}

fn tool_with_alt(name: &str, description: &str, alternatives: &[&str]) -> Requirement {
    tool_requirement(
        name,
        description,
        alternatives.iter().map(|s| s.to_string()).collect(),
    )
}

fn build_table() -> HashMap<&'static str, Vec<Requirement>> {
    let mut m: HashMap<&'static str, Vec<Requirement>> = HashMap::new();

    m.insert(
        "wps_pixie",
        vec![
            root_requirement(),
            monitor_requirement(),
            tool_with_alt("reaver", "Reaver WPS attack tool", &["bully"]),
            tool("pixiewps", "Pixie-Dust offline attack"),
            target_requirement(),
        ],
    );
    m.insert(
        "pmkid",
        vec![
            root_requirement(),
            monitor_requirement(),
            tool("hcxdumptool", "PMKID capture tool"),
            target_requirement(),
        ],
    );
    m.insert(
        "handshake",
        vec![
            root_requirement(),
            monitor_requirement(),
            tool("airodump-ng", "Wireless packet capture"),
            tool("aireplay-ng", "Wireless packet injection"),
            target_requirement(),
        ],
    );
    m.insert(
        "crack_aircrack",
        vec![
            tool("aircrack-ng", "WPA/WPA2 cracker"),
            capture_file_requirement(),
            wordlist_requirement(),
        ],
    );
    m.insert(
        "crack_hashcat",
        vec![
            tool("hashcat", "GPU-accelerated password cracker"),
            hash_file_requirement(),
            wordlist_requirement(),
        ],
    );
    m.insert(
        "eviltwin",
        vec![
            root_requirement(),
            interface_requirement(),
            tool("hostapd", "Access point daemon"),
            tool("dnsmasq", "DNS/DHCP server"),
        ],
    );
    m.insert(
        "eviltwin_full",
        vec![
            root_requirement(),
            interface_requirement(),
            tool("hostapd", "Access point daemon"),
            tool("dnsmasq", "DNS/DHCP server"),
            tool("lighttpd", "Web server"),
            handshake_requirement(),
        ],
    );
    m.insert(
        "recon_subdomain",
        vec![tool_with_alt(
            "subfinder",
            "Subdomain discovery",
            &["amass", "host"],
        )],
    );
    m.insert(
        "recon_tech",
        vec![tool_with_alt("whatweb", "Web technology detector", &["curl"])],
    );
    m.insert(
        "scan_quick",
        vec![tool("nmap", "Network scanner"), target_requirement()],
    );
    m.insert(
        "scan_vuln",
        vec![tool("nmap", "Network scanner"), target_requirement()],
    );
    m.insert(
        "scan_os",
        vec![
            root_requirement(),
            tool("nmap", "Network scanner"),
            target_requirement(),
        ],
    );
    m.insert(
        "creds_hydra",
        vec![tool("hydra", "Network login cracker"), target_requirement()],
    );
    m.insert(
        "creds_hashcat",
        vec![
            tool("hashcat", "GPU-accelerated password cracker"),
            wordlist_requirement(),
        ],
    );
    m.insert(
        "creds_john",
        vec![tool("john", "Password cracker"), wordlist_requirement()],
    );
    m.insert(
        "exploit_sqlmap",
        vec![tool("sqlmap", "SQL injection scanner"), target_requirement()],
    );
    m.insert("exploit_nikto", vec![tool("nikto", "Web server scanner"), target_requirement()]);

    m
}

static ATTACK_REQUIREMENTS: LazyLock<HashMap<&'static str, Vec<Requirement>>> =
    LazyLock::new(build_table);

/// Requirement list for a named action, empty if the action isn't
/// registered (mirrors `ATTACK_REQUIREMENTS.get(action, [])`).
pub fn requirements_for(action: &str) -> Vec<Requirement> {
    ATTACK_REQUIREMENTS.get(action).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_action_returns_its_requirements() {
        let reqs = requirements_for("scan_quick");
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].name, "nmap");
    }

    #[test]
    fn unknown_action_returns_empty() {
        assert!(requirements_for("not-a-real-action").is_empty());
    }
}
