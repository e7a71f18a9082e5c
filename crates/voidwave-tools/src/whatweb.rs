//! WhatWeb web-technology fingerprinter. `parse_output` prefers the
//! `--log-json=-` line format and falls back to scraping plugin names
//! out of the default colourised report line.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Map, Value};

pub fn build_command(target: &str, options: &Map<String, Value>) -> Vec<String> {
    let mut cmd = vec!["whatweb".to_string()];

    cmd.push("-a".to_string());
    cmd.push(options.get("aggression").and_then(Value::as_i64).unwrap_or(1).to_string());
    cmd.push("--log-json=-".to_string());
    cmd.push("--color".to_string());
    cmd.push("never".to_string());

    if let Some(redirects) = options.get("max_redirects").and_then(Value::as_i64) {
        cmd.push("--max-redirects".to_string());
        cmd.push(redirects.to_string());
    }
    if let Some(agent) = options.get("user_agent").and_then(Value::as_str) {
        cmd.push("-U".to_string());
        cmd.push(agent.to_string());
    }
    if let Some(proxy) = options.get("proxy").and_then(Value::as_str) {
        cmd.push("--proxy".to_string());
        cmd.push(proxy.to_string());
    }
    if let Some(cookie) = options.get("cookie").and_then(Value::as_str) {
        cmd.push("--cookie".to_string());
        cmd.push(cookie.to_string());
    }

    cmd.push("-u".to_string());
    cmd.push(target.to_string());
    cmd
}

static PLUGIN_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([A-Za-z0-9_\-]+)(?:\[[^\]]*\])?").expect("valid regex"));

pub fn parse_output(raw: &str) -> Value {
    let mut technologies: Vec<Value> = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Ok(parsed) = serde_json::from_str::<Value>(line) {
            if let Some(plugins) = parsed.get("plugins").and_then(Value::as_object) {
                for (name, detail) in plugins {
                    let version = detail
                        .get("version")
                        .and_then(Value::as_array)
                        .and_then(|v| v.first())
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    technologies.push(json!({"name": name, "version": version}));
                }
            }
            continue;
        }
        if let Some(idx) = line.find(" [") {
            let rest = &line[idx..];
            for caps in PLUGIN_NAME.captures_iter(rest) {
                technologies.push(json!({"name": caps[1].to_string(), "version": Value::Null}));
            }
        }
    }

    json!({"technologies": technologies, "by_name": technologies_by_name(&technologies)})
}

fn technologies_by_name(technologies: &[Value]) -> HashMap<String, Value> {
    let mut map = HashMap::new();
    for t in technologies {
        if let Some(name) = t.get("name").and_then(Value::as_str) {
            map.insert(name.to_string(), t.clone());
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_command_sets_json_logging_and_target() {
        let cmd = build_command("https://example.com", &Map::new());
        assert!(cmd.contains(&"--log-json=-".to_string()));
        assert_eq!(cmd.last(), Some(&"https://example.com".to_string()));
    }

    #[test]
    fn parses_json_plugin_line_into_technologies() {
        let raw = r#"{"target":"https://example.com","plugins":{"WordPress":{"version":["6.4"]},"PHP":{}}}"#;
        let parsed = parse_output(raw);
        let names: Vec<&str> = parsed["technologies"].as_array().unwrap().iter().filter_map(|t| t["name"].as_str()).collect();
        assert!(names.contains(&"WordPress"));
        assert!(names.contains(&"PHP"));
    }
}
