//! Hashcat password cracker: hash/attack mode tables, argv builder and a
//! status-line parser (build_command and the mode tables are ported from
//! the original `HashcatTool`).

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::output::{CrackedCredential, CredentialCrackOutput};

pub const HASH_MODES: &[(&str, u32)] =
    &[("md5", 0), ("sha1", 100), ("sha256", 1400), ("sha512", 1700), ("ntlm", 1000), ("wpa2", 22000)];

pub const ATTACK_MODES: &[(&str, u32)] = &[("wordlist", 0), ("combinator", 1), ("mask", 3), ("hybrid", 6)];

pub fn build_command(target: &str, options: &Map<String, Value>) -> Vec<String> {
    let mut cmd = vec!["hashcat".to_string()];

    let hash_type = options.get("hash_type").and_then(Value::as_str).unwrap_or("md5");
    let mode = HASH_MODES.iter().find(|(name, _)| *name == hash_type).map(|(_, m)| *m).unwrap_or(0);
    cmd.push("-m".to_string());
    cmd.push(mode.to_string());

    let attack = options.get("attack_mode").and_then(Value::as_str).unwrap_or("wordlist");
    let attack_mode = ATTACK_MODES.iter().find(|(name, _)| *name == attack).map(|(_, m)| *m).unwrap_or(0);
    cmd.push("-a".to_string());
    cmd.push(attack_mode.to_string());

    cmd.push("-w".to_string());
    cmd.push(options.get("workload").and_then(Value::as_i64).unwrap_or(3).to_string());

    if options.get("optimized_kernel").and_then(Value::as_bool).unwrap_or(true) {
        cmd.push("-O".to_string());
    }

    cmd.push("--session".to_string());
    cmd.push(options.get("session").and_then(Value::as_str).unwrap_or("voidwave").to_string());
    cmd.push("--status".to_string());
    cmd.push("--status-timer".to_string());
    cmd.push("10".to_string());
    cmd.push("-o".to_string());
    cmd.push("-".to_string());

    cmd.push(target.to_string());

    if let Some(mask) = options.get("mask").and_then(Value::as_str) {
        cmd.push(mask.to_string());
    } else {
        cmd.push(options.get("wordlist").and_then(Value::as_str).unwrap_or("/usr/share/wordlists/rockyou.txt").to_string());
    }

    if let Some(rules) = options.get("rules").and_then(Value::as_str) {
        cmd.push("-r".to_string());
        cmd.push(rules.to_string());
    }

    cmd
}

static CRACKED_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([0-9a-fA-F]{16,})[:*]+(.+)$").expect("valid regex"));
static STATUS_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Status\.+:\s*(.+)$").expect("valid regex"));
static PROGRESS_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Progress\.+:\s*\S+\s*\((\d+(?:\.\d+)?)%\)").expect("valid regex"));
static SPEED_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Speed\.#\d+\.+:\s*(.+)$").expect("valid regex"));
static ETA_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Time\.Estimated\.+:\s*(.+)$").expect("valid regex"));

pub fn parse_output(raw: &str) -> Value {
    let mut out = CredentialCrackOutput { status: "unknown".to_string(), ..Default::default() };

    for line in raw.lines() {
        let line = line.trim();
        if let Some(caps) = CRACKED_LINE.captures(line) {
            out.cracked.push(CrackedCredential { hash: caps[1].to_string(), password: caps[2].to_string() });
            continue;
        }
        if let Some(caps) = STATUS_LINE.captures(line) {
            out.status = caps[1].trim().to_lowercase();
        } else if let Some(caps) = PROGRESS_LINE.captures(line) {
            out.progress = caps[1].parse().unwrap_or(0.0);
        } else if let Some(caps) = SPEED_LINE.captures(line) {
            out.speed = Some(caps[1].trim().to_string());
        } else if let Some(caps) = ETA_LINE.captures(line) {
            out.time_estimated = Some(caps[1].trim().to_string());
        }
    }

    if !out.cracked.is_empty() && out.status == "unknown" {
        out.status = "cracked".to_string();
    }

    serde_json::to_value(out).expect("CredentialCrackOutput always serializes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_command_resolves_hash_and_attack_modes() {
        let mut opts = Map::new();
        opts.insert("hash_type".into(), Value::String("ntlm".into()));
        opts.insert("attack_mode".into(), Value::String("mask".into()));
        opts.insert("mask".into(), Value::String("?d?d?d?d".into()));
        let cmd = build_command("hashes.txt", &opts);
        assert!(cmd.contains(&"1000".to_string()));
        assert!(cmd.contains(&"3".to_string()));
        assert!(cmd.contains(&"?d?d?d?d".to_string()));
    }

    #[test]
    fn parses_cracked_line_and_status_fields() {
        let raw = "Status...........: Running\nProgress.........: 512/1000 (51.20%)\nSpeed.#1.........: 900.1 MH/s\n5f4dcc3b5aa765d61d8327deb882cf99:password\n";
        let parsed: CredentialCrackOutput = serde_json::from_value(parse_output(raw)).unwrap();
        assert_eq!(parsed.cracked.len(), 1);
        assert_eq!(parsed.cracked[0].password, "password");
        assert!((parsed.progress - 51.2).abs() < 0.01);
    }
}
