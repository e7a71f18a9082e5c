//! Nuclei vulnerability scanner. `by_severity`/`by_template`/`by_tag`
//! are kept as counts rather than the original's full per-key finding
//! lists — the findings themselves are already addressable via
//! `findings`, and a count is what the chain scenarios actually bind
//! against (`critical_count`, etc.).

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::output::{VulnFinding, VulnScanOutput, VulnSummary};

pub fn build_command(target: &str, options: &Map<String, Value>) -> Vec<String> {
    let mut cmd = vec!["nuclei".to_string(), "-target".to_string(), target.to_string(), "-jsonl".to_string()];

    if let Some(severity) = options.get("severity").and_then(Value::as_str) {
        cmd.push("-severity".to_string());
        cmd.push(severity.to_string());
    }
    if let Some(tags) = options.get("tags").and_then(Value::as_str) {
        cmd.push("-tags".to_string());
        cmd.push(tags.to_string());
    }
    if let Some(exclude) = options.get("exclude_tags").and_then(Value::as_str) {
        cmd.push("-exclude-tags".to_string());
        cmd.push(exclude.to_string());
    }
    if let Some(templates) = options.get("templates").and_then(Value::as_str) {
        cmd.push("-t".to_string());
        cmd.push(templates.to_string());
    }

    cmd.push("-rate-limit".to_string());
    cmd.push(options.get("rate_limit").and_then(Value::as_i64).unwrap_or(150).to_string());
    cmd.push("-bulk-size".to_string());
    cmd.push(options.get("bulk_size").and_then(Value::as_i64).unwrap_or(25).to_string());
    cmd.push("-c".to_string());
    cmd.push(options.get("concurrency").and_then(Value::as_i64).unwrap_or(25).to_string());
    cmd.push("-timeout".to_string());
    cmd.push(options.get("timeout").and_then(Value::as_i64).unwrap_or(10).to_string());
    cmd.push("-retries".to_string());
    cmd.push(options.get("retries").and_then(Value::as_i64).unwrap_or(1).to_string());

    if let Some(proxy) = options.get("proxy").and_then(Value::as_str) {
        cmd.push("-proxy".to_string());
        cmd.push(proxy.to_string());
    }
    if options.get("follow_redirects").and_then(Value::as_bool).unwrap_or(false) {
        cmd.push("-follow-redirects".to_string());
    }
    if options.get("update_templates").and_then(Value::as_bool).unwrap_or(false) {
        cmd.push("-update-templates".to_string());
    }

    cmd.push("-silent".to_string());
    cmd.push("-no-color".to_string());
    cmd
}

pub fn parse_output(raw: &str) -> Value {
    let mut findings = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Ok(parsed) = serde_json::from_str::<Value>(line) else { continue };
        let info = parsed.get("info").cloned().unwrap_or(Value::Null);
        findings.push(VulnFinding {
            template_id: parsed.get("template-id").and_then(Value::as_str).unwrap_or_default().to_string(),
            template_name: info.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
            severity: info.get("severity").and_then(Value::as_str).unwrap_or("unknown").to_lowercase(),
            r#type: parsed.get("type").and_then(Value::as_str).unwrap_or_default().to_string(),
            host: parsed.get("host").and_then(Value::as_str).unwrap_or_default().to_string(),
            matched_at: parsed.get("matched-at").and_then(Value::as_str).unwrap_or_default().to_string(),
            description: info.get("description").and_then(Value::as_str).unwrap_or_default().to_string(),
            tags: info
                .get("tags")
                .and_then(Value::as_array)
                .map(|a| a.iter().filter_map(|t| t.as_str().map(str::to_string)).collect())
                .unwrap_or_default(),
            reference: info
                .get("reference")
                .and_then(Value::as_array)
                .map(|a| a.iter().filter_map(|t| t.as_str().map(str::to_string)).collect())
                .unwrap_or_default(),
        });
    }

    let mut by_severity: HashMap<String, usize> = HashMap::new();
    let mut by_template: HashMap<String, usize> = HashMap::new();
    let mut by_tag: HashMap<String, usize> = HashMap::new();
    for f in &findings {
        *by_severity.entry(f.severity.clone()).or_insert(0) += 1;
        *by_template.entry(f.template_id.clone()).or_insert(0) += 1;
        for tag in &f.tags {
            *by_tag.entry(tag.clone()).or_insert(0) += 1;
        }
    }

    let summary = VulnSummary {
        total_findings: findings.len(),
        critical: *by_severity.get("critical").unwrap_or(&0),
        high: *by_severity.get("high").unwrap_or(&0),
        medium: *by_severity.get("medium").unwrap_or(&0),
        low: *by_severity.get("low").unwrap_or(&0),
        info: *by_severity.get("info").unwrap_or(&0),
    };

    serde_json::to_value(VulnScanOutput { findings, by_severity, by_template, by_tag, summary })
        .expect("VulnScanOutput always serializes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_command_includes_target_and_severity_filter() {
        let mut opts = Map::new();
        opts.insert("severity".into(), Value::String("critical,high".into()));
        let cmd = build_command("https://example.com", &opts);
        assert!(cmd.contains(&"-severity".to_string()));
        assert!(cmd.contains(&"critical,high".to_string()));
    }

    #[test]
    fn parses_jsonl_findings_and_counts_severity() {
        let raw = r#"{"template-id":"cve-2021-41773","type":"http","host":"https://example.com","matched-at":"https://example.com/","info":{"name":"Apache Path Traversal","severity":"critical","tags":["cve","rce"]}}"#;
        let parsed: VulnScanOutput = serde_json::from_value(parse_output(raw)).unwrap();
        assert_eq!(parsed.findings.len(), 1);
        assert_eq!(parsed.summary.critical, 1);
        assert_eq!(parsed.by_tag.get("rce"), Some(&1));
    }
}
