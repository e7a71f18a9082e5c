//! Subfinder subdomain enumerator. `parse_output` prefers the tool's
//! `-json` line format and falls back to one-subdomain-per-line text,
//! matching the original's dual parsing path.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::output::{SubdomainEntry, SubdomainOutput, SubdomainSummary};

pub fn build_command(target: &str, options: &Map<String, Value>) -> Vec<String> {
    let mut cmd = vec!["subfinder".to_string(), "-d".to_string(), target.to_string(), "-json".to_string()];

    cmd.push("-t".to_string());
    cmd.push(options.get("threads").and_then(Value::as_i64).unwrap_or(10).to_string());
    cmd.push("-timeout".to_string());
    cmd.push(options.get("timeout").and_then(Value::as_i64).unwrap_or(30).to_string());

    if let Some(sources) = options.get("sources").and_then(Value::as_str) {
        cmd.push("-sources".to_string());
        cmd.push(sources.to_string());
    }
    if let Some(exclude) = options.get("exclude_sources").and_then(Value::as_str) {
        cmd.push("-exclude-sources".to_string());
        cmd.push(exclude.to_string());
    }
    if options.get("all_sources").and_then(Value::as_bool).unwrap_or(false) {
        cmd.push("-all".to_string());
    }
    if options.get("recursive").and_then(Value::as_bool).unwrap_or(false) {
        cmd.push("-recursive".to_string());
    }

    cmd.push("-silent".to_string());
    cmd.push("-nc".to_string());
    cmd
}

pub fn parse_output(raw: &str) -> Value {
    let mut by_source: HashMap<String, Vec<String>> = HashMap::new();
    let mut subdomains = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Ok(parsed) = serde_json::from_str::<Value>(line) {
            let host = parsed.get("host").and_then(Value::as_str).unwrap_or_default().to_string();
            let source = parsed.get("source").and_then(Value::as_str).unwrap_or("unknown").to_string();
            if !host.is_empty() {
                by_source.entry(source.clone()).or_default().push(host.clone());
                subdomains.push(SubdomainEntry { subdomain: host, source });
            }
        } else {
            by_source.entry("unknown".to_string()).or_default().push(line.to_string());
            subdomains.push(SubdomainEntry { subdomain: line.to_string(), source: "unknown".to_string() });
        }
    }

    let mut unique_hosts: Vec<String> = subdomains.iter().map(|s| s.subdomain.clone()).collect();
    unique_hosts.sort();
    unique_hosts.dedup();

    let summary = SubdomainSummary {
        total_subdomains: subdomains.len(),
        unique_subdomains: unique_hosts.len(),
        sources_used: by_source.len(),
    };

    serde_json::to_value(SubdomainOutput { subdomains, by_source, unique_hosts, summary })
        .expect("SubdomainOutput always serializes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_command_includes_target_and_json_flag() {
        let cmd = build_command("example.com", &Map::new());
        assert!(cmd.contains(&"-d".to_string()));
        assert!(cmd.contains(&"example.com".to_string()));
        assert!(cmd.contains(&"-json".to_string()));
    }

    #[test]
    fn parses_json_lines_and_dedupes_hosts() {
        let raw = "{\"host\":\"www.example.com\",\"source\":\"crtsh\"}\n{\"host\":\"www.example.com\",\"source\":\"virustotal\"}\n";
        let parsed: SubdomainOutput = serde_json::from_value(parse_output(raw)).unwrap();
        assert_eq!(parsed.subdomains.len(), 2);
        assert_eq!(parsed.unique_hosts.len(), 1);
        assert_eq!(parsed.summary.sources_used, 2);
    }
}
