//! Named transform registry for chain data bindings (spec §4.2).
//!
//! Each transform is a pure function over [`serde_json::Value`]; the chain
//! executor looks one up by name and applies it when a binding names a
//! `transform` field.

mod functions;

use std::collections::HashMap;
use std::sync::LazyLock;

use serde_json::Value;

pub use functions::*;

type TransformFn = fn(&Value) -> Value;

static TRANSFORMS: LazyLock<HashMap<&'static str, TransformFn>> = LazyLock::new(|| {
    let mut m: HashMap<&'static str, TransformFn> = HashMap::new();
    m.insert("flatten_ips", flatten_ips);
    m.insert("filter_open", filter_open_ports);
    m.insert("filter_up", filter_up);
    m.insert("first", first);
    m.insert("last", last);
    m.insert("join", |v| join(v, ","));
    m.insert("join_newline", join_newline);
    m.insert("unique", unique);
    m.insert("count", count);
    m.insert("to_cidr", to_cidr);
    m.insert("to_port_list", to_port_list);
    m.insert("hosts_to_ips", hosts_to_ips);
    m.insert("ports_csv", ports_csv);
    m.insert("ssh_hosts", |v| extract_services(v, "ssh"));
    m.insert("http_hosts", |v| extract_services(v, "http"));
    m.insert("https_hosts", |v| extract_services(v, "https"));
    m.insert("ftp_hosts", |v| extract_services(v, "ftp"));
    m.insert("smb_hosts", |v| extract_services(v, "smb"));
    m.insert("rdp_hosts", |v| extract_services(v, "ms-wbt-server"));
    m.insert("first_ssh", |v| first_service_host(v, "ssh"));
    m.insert("first_http", |v| first_service_host(v, "http"));
    m.insert("first_ftp", |v| first_service_host(v, "ftp"));
    m.insert("ssh_hosts_csv", ssh_hosts_csv);
    m.insert("smb_hosts_csv", smb_hosts_csv);
    m.insert("networks_bssids", networks_to_bssids);
    m.insert("first_bssid", first_network_bssid);
    m.insert("first_channel", first_network_channel);
    m.insert("wpa_networks", |v| networks_by_encryption(v, "WPA"));
    m.insert("wep_networks", |v| networks_by_encryption(v, "WEP"));
    m.insert("open_networks", |v| networks_by_encryption(v, "OPN"));
    m.insert("creds_targets", credentials_to_targets);
    m.insert("creds_userpass", credentials_to_userpass);
    m.insert("extract_ports", |v| extract_ports(v, "open"));
    m.insert("hosts_to_urls", hosts_to_urls);
    m.insert("first_http_url", first_http_url);
    m.insert("filter_web_ports", filter_web_ports);
    m.insert("extract_subdomains", extract_subdomains);
    m.insert("subdomains_targets", subdomains_to_targets);
    m.insert("first_subdomain", first_subdomain);
    m.insert("critical_vulns", |v| extract_vulns_by_severity(v, "critical"));
    m.insert("high_vulns", |v| extract_vulns_by_severity(v, "high"));
    m.insert("medium_vulns", |v| extract_vulns_by_severity(v, "medium"));
    m.insert("extract_directories", extract_directories);
    m.insert("extract_technologies", extract_technologies);
    m.insert("detect_cms", detect_cms);
    m
});

/// Look up a transform by name.
pub fn get_transform(name: &str) -> Option<TransformFn> {
    TRANSFORMS.get(name).copied()
}

/// Apply a named transform, returning `data` unchanged if the name is
/// unregistered.
pub fn apply_transform(name: &str, data: &Value) -> Value {
    match get_transform(name) {
        Some(f) => f(data),
        None => data.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn applies_registered_transform() {
        let data = json!([{"ip": "10.0.0.1"}]);
        assert_eq!(apply_transform("flatten_ips", &data), json!(["10.0.0.1"]));
    }

    #[test]
    fn unknown_transform_passes_through() {
        let data = json!({"a": 1});
        assert_eq!(apply_transform("nonexistent", &data), data);
    }

    #[test]
    fn every_transform_name_from_the_original_registry_is_present() {
        let names = [
            "flatten_ips", "filter_open", "filter_up", "first", "last", "join",
            "join_newline", "unique", "count", "to_cidr", "to_port_list",
            "hosts_to_ips", "ports_csv", "ssh_hosts", "http_hosts", "https_hosts",
            "ftp_hosts", "smb_hosts", "rdp_hosts", "first_ssh", "first_http",
            "first_ftp", "ssh_hosts_csv", "smb_hosts_csv", "networks_bssids",
            "first_bssid", "first_channel", "wpa_networks", "wep_networks",
            "open_networks", "creds_targets", "creds_userpass", "extract_ports",
            "hosts_to_urls", "first_http_url", "filter_web_ports",
            "extract_subdomains", "subdomains_targets", "first_subdomain",
            "critical_vulns", "high_vulns", "medium_vulns", "extract_directories",
            "extract_technologies", "detect_cms",
        ];
        for name in names {
            assert!(get_transform(name).is_some(), "missing transform: {name}");
        }
    }
}
