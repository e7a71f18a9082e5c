//! JSONPath-like data addressing for binding one chain step's output into
//! another step's input (spec §4.2, §9).
//!
//! Supports a small grammar over [`serde_json::Value`]:
//!
//! - key: `hosts`
//! - nested key: `hosts.ip`
//! - index: `hosts[0]`, negative indices count from the end
//! - wildcard: `hosts[*].ip` flattens into a list
//! - filter: `hosts[?state==up]`

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

mod segment;
mod template;

pub use segment::{parse_path, Segment};
pub use template::{extract_keys, flatten_list, format_path};

static ARRAY_ACCESSOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(-?\d+|\*|\?[^\]]+)\]\.?").expect("valid regex"));
static KEY_ACCESSOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^.\[\]]+)\.?").expect("valid regex"));

/// Resolve a path expression against `data`. Missing keys, out-of-range
/// indices, and type mismatches all resolve to `None` rather than an
/// error — a chain step with an unmet binding surfaces that at the
/// executor level (`CoreError::BindingResolution`), not here.
pub fn resolve_path(data: &Value, path: &str) -> Option<Value> {
    if path.is_empty() {
        return Some(data.clone());
    }
    if data.is_null() {
        return None;
    }
    let segments = parse_path(path);
    resolve_segments(Some(data), &segments)
}

fn resolve_segments(data: Option<&Value>, segments: &[Segment]) -> Option<Value> {
    let data = data?;
    let Some((segment, rest)) = segments.split_first() else {
        return Some(data.clone());
    };

    match segment {
        Segment::Key(key) => resolve_segments(data.get(key), rest),
        Segment::Index(idx) => resolve_segments(index_into(data, *idx), rest),
        Segment::Wildcard => {
            let items = data.as_array()?;
            let mut results = Vec::new();
            for item in items {
                let Some(resolved) = resolve_segments(Some(item), rest) else {
                    continue;
                };
                if !rest.is_empty() {
                    if let Value::Array(nested) = resolved {
                        results.extend(nested);
                        continue;
                    }
                }
                results.push(resolved);
            }
            if results.is_empty() {
                None
            } else {
                Some(Value::Array(results))
            }
        }
        Segment::Filter(expr) => {
            let items = data.as_array()?;
            let filtered = apply_filter(items, expr);
            if rest.is_empty() {
                Some(Value::Array(filtered))
            } else {
                resolve_segments(Some(&Value::Array(filtered)), rest)
            }
        }
    }
}

fn index_into(data: &Value, idx: i64) -> Option<&Value> {
    let items = data.as_array()?;
    let resolved = if idx < 0 {
        items.len().checked_sub(idx.unsigned_abs() as usize)?
    } else {
        idx as usize
    };
    items.get(resolved)
}

const FILTER_OPS: [&str; 6] = ["==", "!=", ">=", "<=", ">", "<"];

fn apply_filter(data: &[Value], expr: &str) -> Vec<Value> {
    for op in FILTER_OPS {
        let Some((key, rhs)) = expr.split_once(op) else {
            continue;
        };
        let key = key.trim();
        let rhs = rhs.trim();
        return data
            .iter()
            .filter(|item| item.is_object() && compare(item.get(key), op, rhs))
            .cloned()
            .collect();
    }
    data.to_vec()
}

/// Mirrors the original's "numeric if possible, else string" comparison:
/// equality and inequality always compare stringified values, while
/// ordering operators require both sides to parse as `f64`.
fn compare(left: Option<&Value>, op: &str, rhs: &str) -> bool {
    let Some(left) = left else {
        return false;
    };
    match op {
        "==" => scalar_string(left) == rhs,
        "!=" => scalar_string(left) != rhs,
        ">" | "<" | ">=" | "<=" => {
            let (Some(l), Some(r)) = (as_f64(left), rhs.parse::<f64>().ok()) else {
                return false;
            };
            match op {
                ">" => l > r,
                "<" => l < r,
                ">=" => l >= r,
                "<=" => l <= r,
                _ => unreachable!(),
            }
        }
        _ => false,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string().trim_matches('"').to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "hosts": [
                {"ip": "10.0.0.1", "state": "up", "score": 3},
                {"ip": "10.0.0.2", "state": "down", "score": 7},
            ]
        })
    }

    #[test]
    fn resolves_simple_key() {
        let data = sample();
        assert_eq!(resolve_path(&data, "hosts[0].ip"), Some(json!("10.0.0.1")));
    }

    #[test]
    fn resolves_negative_index() {
        let data = sample();
        assert_eq!(resolve_path(&data, "hosts[-1].ip"), Some(json!("10.0.0.2")));
    }

    #[test]
    fn resolves_wildcard_into_flat_list() {
        let data = sample();
        assert_eq!(
            resolve_path(&data, "hosts[*].ip"),
            Some(json!(["10.0.0.1", "10.0.0.2"]))
        );
    }

    #[test]
    fn resolves_equality_filter() {
        let data = sample();
        let filtered = resolve_path(&data, "hosts[?state==up]").unwrap();
        assert_eq!(filtered.as_array().unwrap().len(), 1);
    }

    #[test]
    fn resolves_numeric_filter() {
        let data = sample();
        let filtered = resolve_path(&data, "hosts[?score>5]").unwrap();
        assert_eq!(filtered[0]["ip"], json!("10.0.0.2"));
    }

    #[test]
    fn missing_key_resolves_to_none() {
        let data = sample();
        assert_eq!(resolve_path(&data, "nope.nested"), None);
    }

    #[test]
    fn out_of_range_index_resolves_to_none() {
        let data = sample();
        assert_eq!(resolve_path(&data, "hosts[9].ip"), None);
    }
}
