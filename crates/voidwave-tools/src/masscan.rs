//! Masscan fast port scanner (build_command ported near-verbatim from the
//! original; `parse_output` additionally groups "Discovered open port"
//! lines by host, since the original leaves this a stub).

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Map, Value};

pub fn build_command(target: &str, options: &Map<String, Value>) -> Vec<String> {
    let mut cmd = vec!["masscan".to_string()];
    let ports = options.get("ports").and_then(Value::as_str).unwrap_or("1-1000");
    cmd.push("-p".to_string());
    cmd.push(ports.to_string());
    let rate = options.get("rate").and_then(Value::as_i64).unwrap_or(1000);
    cmd.push("--rate".to_string());
    cmd.push(rate.to_string());
    cmd.push(target.to_string());
    cmd
}

static DISCOVERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Discovered open port (\d+)/(tcp|udp) on (\S+)").expect("valid regex"));

pub fn parse_output(raw: &str) -> Value {
    let mut hosts: std::collections::BTreeMap<String, Vec<Value>> = std::collections::BTreeMap::new();
    for caps in DISCOVERED.captures_iter(raw) {
        let port: u32 = caps[1].parse().unwrap_or(0);
        let protocol = caps[2].to_string();
        let ip = caps[3].to_string();
        hosts
            .entry(ip)
            .or_default()
            .push(json!({"port": port, "protocol": protocol, "state": "open"}));
    }
    let hosts: Vec<Value> = hosts
        .into_iter()
        .map(|(ip, ports)| json!({"ip": ip, "state": "up", "ports": ports}))
        .collect();
    json!({"hosts": hosts})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_command_includes_ports_and_rate() {
        let mut opts = Map::new();
        opts.insert("ports".into(), json!("1-65535"));
        opts.insert("rate".into(), json!(10000));
        let cmd = build_command("10.0.0.0/24", &opts);
        assert_eq!(cmd, vec!["masscan", "-p", "1-65535", "--rate", "10000", "10.0.0.0/24"]);
    }

    #[test]
    fn parses_discovered_ports_grouped_by_host() {
        let raw = "Discovered open port 22/tcp on 10.0.0.1\nDiscovered open port 80/tcp on 10.0.0.2\n";
        let parsed = parse_output(raw);
        assert_eq!(parsed["hosts"].as_array().unwrap().len(), 2);
    }
}
