use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::resolve_path;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("valid regex"));

/// Substitute `{path}` placeholders in `template` with values resolved
/// against `data`. A list value joins with commas; an unresolved
/// placeholder is left untouched.
pub fn format_path(template: &str, data: &Value) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            let path = &caps[1];
            match resolve_path(data, path) {
                Some(Value::Array(items)) => items
                    .iter()
                    .map(display_value)
                    .collect::<Vec<_>>()
                    .join(","),
                Some(value) => display_value(&value),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Resolve each of `keys` against `data`, keyed by the path string itself.
pub fn extract_keys(data: &Value, keys: &[&str]) -> serde_json::Map<String, Value> {
    keys.iter()
        .map(|key| (key.to_string(), resolve_path(data, key).unwrap_or(Value::Null)))
        .collect()
}

/// Flatten one level of nested arrays; non-array items pass through.
pub fn flatten_list(data: &[Value]) -> Vec<Value> {
    let mut result = Vec::with_capacity(data.len());
    for item in data {
        match item {
            Value::Array(inner) => result.extend(inner.iter().cloned()),
            other => result.push(other.clone()),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_template_with_resolved_values() {
        let data = json!({"hosts": [{"ip": "10.0.0.1", "ports": [{"port": 22}]}]});
        let out = format_path("{hosts[0].ip}:{hosts[0].ports[0].port}", &data);
        assert_eq!(out, "10.0.0.1:22");
    }

    #[test]
    fn formats_list_value_as_joined_string() {
        let data = json!({"ips": ["10.0.0.1", "10.0.0.2"]});
        assert_eq!(format_path("{ips}", &data), "10.0.0.1,10.0.0.2");
    }

    #[test]
    fn leaves_unresolved_placeholder_untouched() {
        let data = json!({});
        assert_eq!(format_path("{missing}", &data), "{missing}");
    }

    #[test]
    fn flattens_one_level() {
        let data = vec![json!([1, 2]), json!(3), json!([4])];
        assert_eq!(flatten_list(&data), vec![json!(1), json!(2), json!(3), json!(4)]);
    }

    #[test]
    fn extracts_keys_by_path() {
        let data = json!({"a": {"b": 1}});
        let extracted = extract_keys(&data, &["a.b", "missing"]);
        assert_eq!(extracted["a.b"], json!(1));
        assert_eq!(extracted["missing"], Value::Null);
    }
}
