//! Nmap wrapper: argv builder and dual-format output parser (spec §4.3,
//! grounded on the original's `NmapTool`).
//!
//! The original prefers nmap's native XML output with a regex-based text
//! fallback on parse failure; we keep the same preference but scan the
//! XML with attribute regexes rather than a full parser, since nmap's
//! XML is attribute-only and flat enough that a parser adds no fidelity
//! the corpus doesn't already gain from `regex` elsewhere.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Value};

use crate::output::{OsMatch, PortScanOutput, PortScanSummary, ScanInfo, ScannedHost, ScannedPort, ScriptResult};

const SCAN_TYPES: &[(&str, &[&str])] = &[
    ("quick", &["-T4", "-F"]),
    ("standard", &["-T3", "-sV"]),
    ("full", &["-T4", "-A", "-p-"]),
    ("stealth", &["-T2", "-sS", "-Pn"]),
    ("udp", &["-sU", "--top-ports", "100"]),
    ("vuln", &["--script", "vuln"]),
];

pub fn build_command(target: &str, options: &serde_json::Map<String, Value>) -> Vec<String> {
    let mut cmd = vec!["nmap".to_string()];

    let scan_type = options.get("scan_type").and_then(Value::as_str).unwrap_or("standard");
    if let Some((_, flags)) = SCAN_TYPES.iter().find(|(name, _)| *name == scan_type) {
        cmd.extend(flags.iter().map(|s| s.to_string()));
    }

    let timing = options.get("timing").and_then(Value::as_i64).unwrap_or(3);
    let timing_flag = format!("-T{timing}");
    if !cmd.contains(&timing_flag) {
        cmd.push(timing_flag);
    }

    let ports = options.get("ports").and_then(Value::as_str).unwrap_or("1-1000");
    if !ports.is_empty() && !cmd.iter().any(|a| a == "-p") {
        cmd.push("-p".to_string());
        cmd.push(ports.to_string());
    }

    let service_detection = options.get("service_detection").and_then(Value::as_bool).unwrap_or(true);
    if service_detection && !cmd.iter().any(|a| a == "-sV" || a == "-A") {
        cmd.push("-sV".to_string());
    }

    let os_detection = options.get("os_detection").and_then(Value::as_bool).unwrap_or(false);
    if os_detection && !cmd.iter().any(|a| a == "-O" || a == "-A") {
        cmd.push("-O".to_string());
    }

    if let Some(scripts) = options.get("scripts").and_then(Value::as_array) {
        if !scripts.is_empty() {
            let names: Vec<&str> = scripts.iter().filter_map(Value::as_str).collect();
            cmd.push("--script".to_string());
            cmd.push(names.join(","));
        }
    }

    cmd.push("-oX".to_string());
    cmd.push("-".to_string());
    cmd.push(target.to_string());

    cmd
}

static HOST_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<host[^>]*>(.*?)</host>").expect("valid regex"));
static IPV4_ADDR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<address addr="([^"]+)" addrtype="ipv4""#).expect("valid regex"));
static HOSTNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<hostname name="([^"]+)""#).expect("valid regex"));
static STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<status state="([^"]+)""#).expect("valid regex"));
static PORT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<port protocol="([^"]+)" portid="(\d+)">(.*?)</port>"#).expect("valid regex"));
static PORT_STATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<state state="([^"]+)""#).expect("valid regex"));
static SERVICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<service name="([^"]+)"(?:[^>]*\bproduct="([^"]*)")?(?:[^>]*\bversion="([^"]*)")?"#)
        .expect("valid regex")
});
static OSMATCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<osmatch name="([^"]*)" accuracy="(\d+)""#).expect("valid regex"));
static SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<script id="([^"]*)" output="([^"]*)""#).expect("valid regex"));
static SCANINFO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<scaninfo type="([^"]*)" protocol="([^"]*)""#).expect("valid regex"));
static RUNSTATS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<finished[^>]*\belapsed="([^"]*)""#).expect("valid regex"));

/// Parse nmap's `-oX -` output. Returns `None` if no `<host>` elements
/// are found, signalling the caller should fall back to text parsing.
pub fn parse_xml(raw: &str) -> Option<Value> {
    if !raw.contains("<host") {
        return None;
    }

    let mut hosts = Vec::new();
    for caps in HOST_BLOCK.captures_iter(raw) {
        let block = &caps[1];
        let Some(ip) = IPV4_ADDR.captures(block).map(|c| c[1].to_string()) else {
            continue;
        };
        let hostname = HOSTNAME.captures(block).map(|c| c[1].to_string());
        let state = STATUS
            .captures(block)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let mut ports = Vec::new();
        for port_caps in PORT_BLOCK.captures_iter(block) {
            let protocol = port_caps[1].to_string();
            let port = port_caps[2].parse().unwrap_or(0);
            let port_block = &port_caps[3];
            let port_state = PORT_STATE
                .captures(port_block)
                .map(|c| c[1].to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let (service, product, version) = match SERVICE.captures(port_block) {
                Some(c) => (
                    c[1].to_string(),
                    c.get(2).map(|m| m.as_str().to_string()).filter(|s| !s.is_empty()),
                    c.get(3).map(|m| m.as_str().to_string()).filter(|s| !s.is_empty()),
                ),
                None => ("unknown".to_string(), None, None),
            };
            ports.push(ScannedPort {
                port,
                protocol,
                state: port_state,
                service,
                version,
                product,
            });
        }

        let os_matches = OSMATCH
            .captures_iter(block)
            .map(|c| OsMatch {
                name: Some(c[1].to_string()).filter(|s| !s.is_empty()),
                accuracy: c[2].parse().unwrap_or(0),
            })
            .collect();

        let scripts = SCRIPT
            .captures_iter(block)
            .map(|c| ScriptResult {
                id: Some(c[1].to_string()),
                output: Some(c[2].to_string()),
            })
            .collect();

        hosts.push(ScannedHost {
            ip,
            hostname,
            state,
            ports,
            os_matches,
            scripts,
        });
    }

    let scan_info = ScanInfo {
        r#type: SCANINFO.captures(raw).map(|c| c[1].to_string()),
        protocol: SCANINFO.captures(raw).map(|c| c[2].to_string()),
        elapsed: RUNSTATS.captures(raw).map(|c| c[1].to_string()),
    };

    let summary = PortScanSummary {
        total_hosts: hosts.len(),
        up_hosts: hosts.iter().filter(|h| h.state == "up").count(),
        total_ports: hosts.iter().map(|h| h.ports.len()).sum(),
        open_ports: hosts
            .iter()
            .map(|h| h.ports.iter().filter(|p| p.state == "open").count())
            .sum(),
    };

    Some(json!(PortScanOutput { hosts, scan_info, summary }))
}

static TEXT_HOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Nmap scan report for (\S+)").expect("valid regex"));
static TEXT_PORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)/(tcp|udp)\s+(\w+)\s+(\S+)").expect("valid regex"));

/// Fallback parser over nmap's human-readable stdout.
pub fn parse_text(raw: &str) -> Value {
    let mut hosts: Vec<Value> = Vec::new();
    let mut current: Option<(String, Vec<Value>)> = None;

    for line in raw.lines() {
        if let Some(caps) = TEXT_HOST.captures(line) {
            if let Some((ip, ports)) = current.take() {
                hosts.push(json!({"ip": ip, "ports": ports}));
            }
            current = Some((caps[1].to_string(), Vec::new()));
            continue;
        }
        if let (Some(caps), Some((_, ports))) = (TEXT_PORT.captures(line), current.as_mut()) {
            ports.push(json!({
                "port": caps[1].parse::<u32>().unwrap_or(0),
                "protocol": &caps[2],
                "state": &caps[3],
                "service": &caps[4],
            }));
        }
    }
    if let Some((ip, ports)) = current {
        hosts.push(json!({"ip": ip, "ports": ports}));
    }

    json!({"hosts": hosts})
}

pub fn parse_output(raw: &str) -> Value {
    parse_xml(raw).unwrap_or_else(|| parse_text(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_command_uses_standard_preset_by_default() {
        let cmd = build_command("10.0.0.1", &serde_json::Map::new());
        assert!(cmd.contains(&"-sV".to_string()));
        assert!(cmd.contains(&"-T3".to_string()));
        assert_eq!(cmd.last(), Some(&"10.0.0.1".to_string()));
    }

    #[test]
    fn build_command_honors_explicit_ports() {
        let mut opts = serde_json::Map::new();
        opts.insert("ports".into(), json!("22,80"));
        let cmd = build_command("10.0.0.1", &opts);
        let p = cmd.iter().position(|a| a == "-p").unwrap();
        assert_eq!(cmd[p + 1], "22,80");
    }

    #[test]
    fn parses_xml_host_with_open_port() {
        let xml = r#"<nmaprun><scaninfo type="syn" protocol="tcp"/>
<host><status state="up"/><address addr="10.0.0.1" addrtype="ipv4"/>
<ports><port protocol="tcp" portid="22"><state state="open"/><service name="ssh"/></port></ports>
</host><runstats><finished time="1" timestr="" elapsed="1.2"/></runstats></nmaprun>"#;
        let parsed: PortScanOutput = serde_json::from_value(parse_output(xml)).unwrap();
        assert_eq!(parsed.hosts.len(), 1);
        assert_eq!(parsed.hosts[0].ports[0].port, 22);
        assert_eq!(parsed.summary.open_ports, 1);
    }

    #[test]
    fn falls_back_to_text_parsing_without_xml() {
        let text = "Nmap scan report for 10.0.0.2\n22/tcp open ssh\n";
        let parsed = parse_output(text);
        assert_eq!(parsed["hosts"][0]["ip"], json!("10.0.0.2"));
        assert_eq!(parsed["hosts"][0]["ports"][0]["port"], json!(22));
    }
}
