//! Fallback for tool names this crate has no structured parser for
//! (whois, dig, curl, aircrack-ng, reaver, pixiewps, sqlmap, nikto, …).
//! Per the collaborator contract, only a stable structured subset per
//! tool is required — everything else gets raw passthrough.

use serde_json::{json, Map, Value};

pub fn build_command(name: &str, target: &str, options: &Map<String, Value>) -> Vec<String> {
    let mut cmd = vec![name.to_string()];
    if let Some(args) = options.get("args").and_then(Value::as_array) {
        cmd.extend(args.iter().filter_map(|a| a.as_str().map(str::to_string)));
    }
    cmd.push(target.to_string());
    cmd
}

pub fn parse_output(raw: &str) -> Value {
    json!({"raw_output": raw})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_command_appends_extra_args_before_target() {
        let mut opts = Map::new();
        opts.insert("args".into(), json!(["-A"]));
        let cmd = build_command("whois", "example.com", &opts);
        assert_eq!(cmd, vec!["whois", "-A", "example.com"]);
    }

    #[test]
    fn parse_output_wraps_raw_text() {
        let parsed = parse_output("Domain Name: EXAMPLE.COM\n");
        assert_eq!(parsed["raw_output"], json!("Domain Name: EXAMPLE.COM\n"));
    }
}
