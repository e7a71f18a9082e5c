//! John the Ripper: argv builder follows the original; `parse_output`
//! extends the original's stub by recognising `--show`-style
//! `hash:password` lines, since this crate's consumers expect the
//! standard credential-cracker shape rather than raw text.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::output::{CrackedCredential, CredentialCrackOutput};

pub fn build_command(target: &str, options: &Map<String, Value>) -> Vec<String> {
    let mut cmd = vec!["john".to_string()];

    let wordlist = options.get("wordlist").and_then(Value::as_str).unwrap_or("/usr/share/wordlists/rockyou.txt");
    cmd.push(format!("--wordlist={wordlist}"));

    if let Some(format) = options.get("format").and_then(Value::as_str) {
        cmd.push(format!("--format={format}"));
    }
    if let Some(rules) = options.get("rules").and_then(Value::as_str) {
        cmd.push(format!("--rules={rules}"));
    }

    cmd.push(target.to_string());
    cmd
}

static SHOW_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([^:\n]+):([^:\n]+)(?::.*)?$").expect("valid regex"));

pub fn parse_output(raw: &str) -> Value {
    let mut cracked = Vec::new();
    for line in raw.lines() {
        if line.starts_with("Loaded") || line.starts_with("Warning") || line.contains("password hash") {
            continue;
        }
        if let Some(caps) = SHOW_LINE.captures(line.trim()) {
            cracked.push(CrackedCredential { hash: caps[1].to_string(), password: caps[2].to_string() });
        }
    }

    let status = if cracked.is_empty() { "no_results".to_string() } else { "cracked".to_string() };
    let out = CredentialCrackOutput { cracked, status, progress: 100.0, speed: None, time_estimated: None };
    serde_json::to_value(out).expect("CredentialCrackOutput always serializes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_command_includes_wordlist_and_format() {
        let mut opts = Map::new();
        opts.insert("format".into(), Value::String("raw-md5".into()));
        let cmd = build_command("hashes.txt", &opts);
        assert!(cmd.iter().any(|a| a == "--format=raw-md5"));
        assert_eq!(cmd.last(), Some(&"hashes.txt".to_string()));
    }

    #[test]
    fn parses_show_style_hash_password_lines() {
        let raw = "admin:hunter2:1001:Admin User::/root:/bin/bash\n";
        let parsed: CredentialCrackOutput = serde_json::from_value(parse_output(raw)).unwrap();
        assert_eq!(parsed.cracked[0].hash, "admin");
        assert_eq!(parsed.cracked[0].password, "hunter2");
    }
}
