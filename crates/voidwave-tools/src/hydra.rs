//! Hydra network login cracker. Unlike hashcat/john, hydra's native
//! output is a set of host/service credential hits rather than a
//! hash:password pair, so it gets its own `NetworkCredsOutput` shape
//! (feeding `credentials_to_targets`/`credentials_to_userpass`).

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;

pub fn build_command(target: &str, options: &Map<String, Value>) -> Vec<String> {
    let mut cmd = vec!["hydra".to_string()];

    match (options.get("login").and_then(Value::as_str), options.get("login_list").and_then(Value::as_str)) {
        (_, Some(list)) => {
            cmd.push("-L".to_string());
            cmd.push(list.to_string());
        }
        (Some(login), None) => {
            cmd.push("-l".to_string());
            cmd.push(login.to_string());
        }
        (None, None) => {
            cmd.push("-l".to_string());
            cmd.push("admin".to_string());
        }
    }

    match (options.get("password").and_then(Value::as_str), options.get("password_list").and_then(Value::as_str)) {
        (_, Some(list)) => {
            cmd.push("-P".to_string());
            cmd.push(list.to_string());
        }
        (Some(pass), None) => {
            cmd.push("-p".to_string());
            cmd.push(pass.to_string());
        }
        (None, None) => {
            cmd.push("-P".to_string());
            cmd.push("/usr/share/wordlists/rockyou.txt".to_string());
        }
    }

    cmd.push("-t".to_string());
    cmd.push(options.get("tasks").and_then(Value::as_i64).unwrap_or(16).to_string());

    cmd.push(target.to_string());
    let service = options.get("service").and_then(Value::as_str).unwrap_or("ssh");
    cmd.push(service.to_string());
    cmd
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkCredsOutput {
    pub credentials: Vec<NetworkCredential>,
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkCredential {
    pub host: String,
    pub port: Option<u32>,
    pub service: String,
    pub username: String,
    pub password: String,
}

static HIT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\[(\d+)\])?\[(\w+)\]\s+host:\s*(\S+)\s+login:\s*(\S+)\s+password:\s*(\S+)").expect("valid regex")
});

pub fn parse_output(raw: &str) -> Value {
    let mut credentials = Vec::new();
    for caps in HIT_LINE.captures_iter(raw) {
        credentials.push(NetworkCredential {
            host: caps[3].to_string(),
            port: caps.get(1).and_then(|m| m.as_str().parse().ok()),
            service: caps[2].to_string(),
            username: caps[4].to_string(),
            password: caps[5].to_string(),
        });
    }
    let status = if credentials.is_empty() { "no_results".to_string() } else { "found".to_string() };
    serde_json::to_value(NetworkCredsOutput { credentials, status }).expect("NetworkCredsOutput always serializes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_command_defaults_service_to_ssh() {
        let cmd = build_command("10.0.0.1", &Map::new());
        assert_eq!(cmd.last(), Some(&"ssh".to_string()));
        assert!(cmd.contains(&"10.0.0.1".to_string()));
    }

    #[test]
    fn parses_hit_lines_into_credentials() {
        let raw = "[22][ssh] host: 10.0.0.1   login: admin   password: admin123\n";
        let parsed: NetworkCredsOutput = serde_json::from_value(parse_output(raw)).unwrap();
        assert_eq!(parsed.credentials[0].username, "admin");
        assert_eq!(parsed.credentials[0].password, "admin123");
    }
}
