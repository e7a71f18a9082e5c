//! The individual named transforms. Each takes and returns a
//! [`serde_json::Value`] so the whole family can share one registry
//! signature (spec §4.2's "named pure-function transforms").

use serde_json::{json, Value};

fn as_hosts(data: &Value) -> &[Value] {
    data.as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn str_field<'a>(obj: &'a Value, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

pub fn flatten_ips(data: &Value) -> Value {
    let ips: Vec<&str> = as_hosts(data).iter().filter_map(|h| str_field(h, "ip")).collect();
    json!(ips)
}

pub fn filter_open_ports(data: &Value) -> Value {
    let hosts: Vec<Value> = as_hosts(data)
        .iter()
        .filter(|h| {
            h.get("ports")
                .and_then(Value::as_array)
                .is_some_and(|ports| ports.iter().any(|p| str_field(p, "state") == Some("open")))
        })
        .cloned()
        .collect();
    json!(hosts)
}

pub fn filter_by_state(data: &Value, state: &str) -> Value {
    let hosts: Vec<Value> = as_hosts(data)
        .iter()
        .filter(|h| str_field(h, "state") == Some(state))
        .cloned()
        .collect();
    json!(hosts)
}

pub fn filter_up(data: &Value) -> Value {
    filter_by_state(data, "up")
}

/// `ip:port` pairs for every open port matching `service`.
pub fn extract_services(data: &Value, service: &str) -> Value {
    let mut result = Vec::new();
    for host in as_hosts(data) {
        let Some(ip) = str_field(host, "ip") else {
            continue;
        };
        for port in host.get("ports").and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]) {
            if str_field(port, "service") == Some(service) && str_field(port, "state") == Some("open") {
                let port_num = port.get("port").cloned().unwrap_or(Value::Null);
                result.push(json!(format!("{ip}:{}", display(&port_num))));
            }
        }
    }
    json!(result)
}

pub fn extract_ports(data: &Value, state: &str) -> Value {
    let mut ports: std::collections::BTreeSet<i64> = std::collections::BTreeSet::new();
    for host in as_hosts(data) {
        for port in host.get("ports").and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]) {
            if str_field(port, "state") == Some(state) {
                if let Some(num) = port.get("port").and_then(Value::as_i64) {
                    ports.insert(num);
                }
            }
        }
    }
    json!(ports.into_iter().collect::<Vec<_>>())
}

pub fn networks_to_bssids(data: &Value) -> Value {
    let bssids: Vec<&str> = as_hosts(data).iter().filter_map(|n| str_field(n, "bssid")).collect();
    json!(bssids)
}

pub fn networks_by_encryption(data: &Value, encryption: &str) -> Value {
    let needle = encryption.to_uppercase();
    let nets: Vec<Value> = as_hosts(data)
        .iter()
        .filter(|n| {
            str_field(n, "encryption")
                .unwrap_or_default()
                .to_uppercase()
                .contains(&needle)
        })
        .cloned()
        .collect();
    json!(nets)
}

pub fn credentials_to_targets(data: &Value) -> Value {
    let targets: Vec<String> = as_hosts(data)
        .iter()
        .filter_map(|c| {
            let host = str_field(c, "host")?;
            let port = c.get("port")?;
            Some(format!("{host}:{}", display(port)))
        })
        .collect();
    json!(targets)
}

pub fn credentials_to_userpass(data: &Value) -> Value {
    let creds: Vec<String> = as_hosts(data)
        .iter()
        .filter(|c| str_field(c, "password").is_some())
        .map(|c| {
            format!(
                "{}:{}",
                str_field(c, "username").unwrap_or_default(),
                str_field(c, "password").unwrap_or_default()
            )
        })
        .collect();
    json!(creds)
}

pub fn first(data: &Value) -> Value {
    as_hosts(data).first().cloned().unwrap_or(Value::Null)
}

pub fn last(data: &Value) -> Value {
    as_hosts(data).last().cloned().unwrap_or(Value::Null)
}

pub fn join(data: &Value, separator: &str) -> Value {
    let joined = as_hosts(data)
        .iter()
        .filter(|v| !v.is_null())
        .map(display)
        .collect::<Vec<_>>()
        .join(separator);
    json!(joined)
}

pub fn join_newline(data: &Value) -> Value {
    join(data, "\n")
}

pub fn unique(data: &Value) -> Value {
    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::new();
    for item in as_hosts(data) {
        let key = display(item);
        if seen.insert(key) {
            result.push(item.clone());
        }
    }
    json!(result)
}

pub fn count(data: &Value) -> Value {
    json!(as_hosts(data).len())
}

pub fn to_cidr(data: &Value) -> Value {
    let ips = flatten_ips(data);
    let deduped = unique(&ips);
    join(&deduped, ",")
}

pub fn to_port_list(data: &Value) -> Value {
    let mut ports: std::collections::BTreeSet<i64> = std::collections::BTreeSet::new();
    for item in as_hosts(data) {
        if let Some(num) = item.as_i64() {
            ports.insert(num);
        }
    }
    json!(ports.into_iter().map(|p| p.to_string()).collect::<Vec<_>>().join(","))
}

pub fn hosts_to_ips(data: &Value) -> Value {
    let ips = as_hosts(data)
        .iter()
        .filter_map(|h| str_field(h, "ip"))
        .collect::<Vec<_>>();
    if ips.is_empty() {
        Value::Null
    } else {
        json!(ips.join(","))
    }
}

pub fn ports_csv(data: &Value) -> Value {
    let Value::Array(ports) = extract_ports(data, "open") else {
        return json!("1-1000");
    };
    if ports.is_empty() {
        json!("1-1000")
    } else {
        json!(ports.iter().map(display).collect::<Vec<_>>().join(","))
    }
}

pub fn first_service_host(data: &Value, service: &str) -> Value {
    let Value::Array(hosts) = extract_services(data, service) else {
        return Value::Null;
    };
    hosts.into_iter().next().unwrap_or(Value::Null)
}

fn joined_service_hosts(data: &Value, service: &str) -> Value {
    let Value::Array(hosts) = extract_services(data, service) else {
        return Value::Null;
    };
    if hosts.is_empty() {
        Value::Null
    } else {
        json!(hosts.iter().map(display).collect::<Vec<_>>().join(","))
    }
}

pub fn ssh_hosts_csv(data: &Value) -> Value {
    joined_service_hosts(data, "ssh")
}

pub fn smb_hosts_csv(data: &Value) -> Value {
    joined_service_hosts(data, "smb")
}

pub fn first_network_bssid(data: &Value) -> Value {
    as_hosts(data)
        .first()
        .and_then(|n| n.get("bssid"))
        .cloned()
        .unwrap_or(Value::Null)
}

pub fn first_network_channel(data: &Value) -> Value {
    as_hosts(data)
        .first()
        .and_then(|n| n.get("channel"))
        .cloned()
        .unwrap_or(Value::Null)
}

pub fn hosts_to_urls(data: &Value) -> Value {
    let hosts = as_hosts(data);
    let mut urls = Vec::new();
    for host in hosts {
        let Some(ip) = str_field(host, "ip") else {
            continue;
        };
        let ports = host.get("ports").and_then(Value::as_array);
        match ports {
            Some(ports) if !ports.is_empty() => {
                for port in ports {
                    if str_field(port, "state") != Some("open") {
                        continue;
                    }
                    let port_num = port.get("port").and_then(Value::as_i64);
                    let service = str_field(port, "service").unwrap_or_default();
                    if matches!(service, "http" | "http-alt") || matches!(port_num, Some(80 | 8080 | 8000)) {
                        urls.push(format!("http://{ip}:{}", display(port.get("port").unwrap_or(&Value::Null))));
                    } else if matches!(service, "https" | "ssl/http") || matches!(port_num, Some(443 | 8443)) {
                        urls.push(format!("https://{ip}:{}", display(port.get("port").unwrap_or(&Value::Null))));
                    }
                }
            }
            _ => urls.push(format!("http://{ip}")),
        }
    }
    if urls.is_empty() {
        if let Some(ip) = hosts.first().and_then(|h| str_field(h, "ip")) {
            return json!([format!("http://{ip}")]);
        }
        return json!([]);
    }
    json!(urls)
}

pub fn first_http_url(data: &Value) -> Value {
    let Value::Array(urls) = hosts_to_urls(data) else {
        return Value::Null;
    };
    urls.into_iter().next().unwrap_or(Value::Null)
}

pub fn filter_web_ports(data: &Value) -> Value {
    const WEB_PORTS: [i64; 7] = [80, 443, 8080, 8443, 8000, 8888, 9000];
    const WEB_SERVICES: [&str; 4] = ["http", "https", "http-alt", "ssl/http"];
    let mut result = Vec::new();
    for host in as_hosts(data) {
        let ports = host.get("ports").and_then(Value::as_array);
        let Some(ports) = ports else { continue };
        let web_ports: Vec<Value> = ports
            .iter()
            .filter(|p| {
                p.get("port").and_then(Value::as_i64).is_some_and(|n| WEB_PORTS.contains(&n))
                    || str_field(p, "service").is_some_and(|s| WEB_SERVICES.contains(&s))
            })
            .cloned()
            .collect();
        if !web_ports.is_empty() {
            let mut host = host.clone();
            host["ports"] = json!(web_ports);
            result.push(host);
        }
    }
    json!(result)
}

pub fn extract_subdomains(data: &Value) -> Value {
    data.get("unique_hosts").cloned().unwrap_or(json!([]))
}

pub fn subdomains_to_targets(data: &Value) -> Value {
    let Value::Array(subs) = extract_subdomains(data) else {
        return json!("");
    };
    json!(subs.iter().map(display).collect::<Vec<_>>().join(","))
}

pub fn first_subdomain(data: &Value) -> Value {
    let Value::Array(subs) = extract_subdomains(data) else {
        return Value::Null;
    };
    subs.into_iter().next().unwrap_or(Value::Null)
}

const SEVERITY_ORDER: [&str; 5] = ["info", "low", "medium", "high", "critical"];

pub fn extract_vulns_by_severity(data: &Value, min_severity: &str) -> Value {
    let min_idx = SEVERITY_ORDER
        .iter()
        .position(|s| *s == min_severity.to_lowercase())
        .unwrap_or(2);
    let findings = data.get("findings").and_then(Value::as_array).cloned().unwrap_or_default();
    let filtered: Vec<Value> = findings
        .into_iter()
        .filter(|f| {
            let severity = str_field(f, "severity").unwrap_or("info").to_lowercase();
            SEVERITY_ORDER.iter().position(|s| *s == severity).unwrap_or(0) >= min_idx
        })
        .collect();
    json!(filtered)
}

pub fn extract_directories(data: &Value) -> Value {
    let dirs = data.get("directories").and_then(Value::as_array).cloned().unwrap_or_default();
    let paths: Vec<String> = dirs
        .iter()
        .map(|d| {
            str_field(d, "path")
                .or_else(|| str_field(d, "url"))
                .unwrap_or_default()
                .to_string()
        })
        .collect();
    json!(paths)
}

pub fn extract_technologies(data: &Value) -> Value {
    let techs = data.get("technologies").and_then(Value::as_array).cloned().unwrap_or_default();
    let names: Vec<&str> = techs.iter().filter_map(|t| str_field(t, "name")).collect();
    json!(names)
}

const CMS_KEYWORDS: [(&str, &str); 8] = [
    ("wordpress", "WordPress"),
    ("joomla", "Joomla"),
    ("drupal", "Drupal"),
    ("magento", "Magento"),
    ("shopify", "Shopify"),
    ("woocommerce", "WooCommerce"),
    ("prestashop", "PrestaShop"),
    ("typo3", "TYPO3"),
];

pub fn detect_cms(data: &Value) -> Value {
    let Value::Array(techs) = extract_technologies(data) else {
        return Value::Null;
    };
    for tech in techs.iter().filter_map(Value::as_str) {
        let lower = tech.to_lowercase();
        for (keyword, name) in CMS_KEYWORDS {
            if lower.contains(keyword) {
                return json!(name);
            }
        }
    }
    Value::Null
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flatten_ips_skips_hosts_without_ip() {
        let data = json!([{"ip": "10.0.0.1"}, {"name": "no-ip"}]);
        assert_eq!(flatten_ips(&data), json!(["10.0.0.1"]));
    }

    #[test]
    fn extract_ports_dedupes_and_sorts() {
        let data = json!([
            {"ports": [{"port": 80, "state": "open"}]},
            {"ports": [{"port": 22, "state": "open"}, {"port": 80, "state": "open"}]},
        ]);
        assert_eq!(extract_ports(&data, "open"), json!([22, 80]));
    }

    #[test]
    fn hosts_to_urls_picks_http_and_https() {
        let data = json!([{
            "ip": "10.0.0.1",
            "ports": [
                {"port": 80, "state": "open", "service": "http"},
                {"port": 443, "state": "open", "service": "https"},
            ]
        }]);
        let urls = hosts_to_urls(&data);
        assert_eq!(urls, json!(["http://10.0.0.1:80", "https://10.0.0.1:443"]));
    }

    #[test]
    fn detect_cms_matches_case_insensitively() {
        let data = json!({"technologies": [{"name": "WordPress 6.2"}]});
        assert_eq!(detect_cms(&data), json!("WordPress"));
    }

    #[test]
    fn unique_preserves_order() {
        let data = json!([1, 2, 1, 3, 2]);
        assert_eq!(unique(&data), json!([1, 2, 3]));
    }

    #[test]
    fn to_cidr_joins_unique_ips() {
        let data = json!([{"ip": "10.0.0.1"}, {"ip": "10.0.0.1"}, {"ip": "10.0.0.2"}]);
        assert_eq!(to_cidr(&data), json!("10.0.0.1,10.0.0.2"));
    }
}
