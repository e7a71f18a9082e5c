//! Gobuster directory/DNS/vhost/fuzz brute-forcer. `build_command`
//! switches on `mode` the way the original does; `parse_output` adapts
//! gobuster's native per-mode shape into the spec's canonical web-fuzz
//! contract (`results`/`directories`/`files`/`by_status`/`summary`)
//! rather than copying the original's separate `directories`/`files`/
//! `subdomains`/`vhosts` dict.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::output::{FuzzResult, WebFuzzOutput, WebFuzzSummary};

pub fn build_command(target: &str, options: &Map<String, Value>) -> Vec<String> {
    let mode = options.get("mode").and_then(Value::as_str).unwrap_or("dir");
    let mut cmd = vec!["gobuster".to_string(), mode.to_string()];

    match mode {
        "dns" => {
            cmd.push("-d".to_string());
            cmd.push(target.to_string());
        }
        "vhost" | "fuzz" => {
            cmd.push("-u".to_string());
            cmd.push(target.to_string());
        }
        _ => {
            cmd.push("-u".to_string());
            cmd.push(target.to_string());
        }
    }

    let wordlist = options.get("wordlist").and_then(Value::as_str).unwrap_or("/usr/share/wordlists/dirb/common.txt");
    cmd.push("-w".to_string());
    cmd.push(wordlist.to_string());

    cmd.push("-t".to_string());
    cmd.push(options.get("threads").and_then(Value::as_i64).unwrap_or(10).to_string());

    if let Some(ext) = options.get("extensions").and_then(Value::as_str) {
        cmd.push("-x".to_string());
        cmd.push(ext.to_string());
    }
    if options.get("no_tls_validation").and_then(Value::as_bool).unwrap_or(false) {
        cmd.push("-k".to_string());
    }

    cmd.push("-q".to_string());
    cmd
}

static DIR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+\(Status:\s*(\d+)\)\s*\[Size:\s*(\d+)\]").expect("valid regex"));
static DNS_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Found:\s*(\S+)").expect("valid regex"));

pub fn parse_output(raw: &str) -> Value {
    let mut results = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if let Some(caps) = DIR_LINE.captures(line) {
            let url = caps[1].to_string();
            results.push(FuzzResult {
                url: url.clone(),
                input: url,
                status: caps[2].parse().unwrap_or(0),
                length: caps[3].parse().unwrap_or(0),
                words: 0,
                lines: 0,
            });
        } else if let Some(caps) = DNS_LINE.captures(line) {
            let host = caps[1].to_string();
            results.push(FuzzResult { url: host.clone(), input: host, status: 200, length: 0, words: 0, lines: 0 });
        }
    }

    let directories: Vec<FuzzResult> = results.iter().filter(|r| r.url.ends_with('/')).cloned().collect();
    let files: Vec<FuzzResult> = results.iter().filter(|r| !r.url.ends_with('/')).cloned().collect();

    let mut by_status: HashMap<String, usize> = HashMap::new();
    for r in &results {
        *by_status.entry(r.status.to_string()).or_insert(0) += 1;
    }

    let summary = WebFuzzSummary {
        total_results: results.len(),
        directories: directories.len(),
        files: files.len(),
        status_200: *by_status.get("200").unwrap_or(&0),
        status_301: *by_status.get("301").unwrap_or(&0),
        status_403: *by_status.get("403").unwrap_or(&0),
    };

    serde_json::to_value(WebFuzzOutput { results, directories, files, by_status, summary })
        .expect("WebFuzzOutput always serializes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_command_switches_flag_by_mode() {
        let mut opts = Map::new();
        opts.insert("mode".into(), Value::String("dns".into()));
        let cmd = build_command("example.com", &opts);
        assert_eq!(cmd[1], "dns");
        assert!(cmd.contains(&"-d".to_string()));
    }

    #[test]
    fn parses_directory_hits_into_web_fuzz_output() {
        let raw = "/admin/ (Status: 200) [Size: 123]\n/login.php (Status: 301) [Size: 0]\n";
        let parsed: WebFuzzOutput = serde_json::from_value(parse_output(raw)).unwrap();
        assert_eq!(parsed.summary.total_results, 2);
        assert_eq!(parsed.directories.len(), 1);
        assert_eq!(parsed.files.len(), 1);
    }
}
