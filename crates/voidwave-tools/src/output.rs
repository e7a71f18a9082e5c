//! Stable structured output shapes each tool family promises to parsers
//! downstream of a chain step (spec §6, "Tool-output structured shapes").
//! These are the contract consumers bind against; the individual tool
//! parsers below build them and hand back `serde_json::Value` so the
//! path resolver can address into them uniformly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortScanOutput {
    pub hosts: Vec<ScannedHost>,
    pub scan_info: ScanInfo,
    pub summary: PortScanSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScannedHost {
    pub ip: String,
    pub hostname: Option<String>,
    pub state: String,
    pub ports: Vec<ScannedPort>,
    pub os_matches: Vec<OsMatch>,
    pub scripts: Vec<ScriptResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScannedPort {
    pub port: u32,
    pub protocol: String,
    pub state: String,
    pub service: String,
    pub version: Option<String>,
    pub product: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsMatch {
    pub name: Option<String>,
    pub accuracy: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptResult {
    pub id: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanInfo {
    pub r#type: Option<String>,
    pub protocol: Option<String>,
    pub elapsed: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortScanSummary {
    pub total_hosts: usize,
    pub up_hosts: usize,
    pub total_ports: usize,
    pub open_ports: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WirelessScanOutput {
    pub networks: Vec<WirelessNetwork>,
    pub clients: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WirelessNetwork {
    pub bssid: String,
    pub essid: Option<String>,
    pub channel: u32,
    pub encryption: String,
    pub signal: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialCrackOutput {
    pub cracked: Vec<CrackedCredential>,
    pub status: String,
    pub progress: f64,
    pub speed: Option<String>,
    pub time_estimated: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrackedCredential {
    pub hash: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebFuzzOutput {
    pub results: Vec<FuzzResult>,
    pub directories: Vec<FuzzResult>,
    pub files: Vec<FuzzResult>,
    pub by_status: HashMap<String, usize>,
    pub summary: WebFuzzSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FuzzResult {
    pub url: String,
    pub input: String,
    pub status: u32,
    pub length: u64,
    pub words: u64,
    pub lines: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebFuzzSummary {
    pub total_results: usize,
    pub directories: usize,
    pub files: usize,
    pub status_200: usize,
    pub status_301: usize,
    pub status_403: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubdomainOutput {
    pub subdomains: Vec<SubdomainEntry>,
    pub by_source: HashMap<String, Vec<String>>,
    pub unique_hosts: Vec<String>,
    pub summary: SubdomainSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubdomainEntry {
    pub subdomain: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubdomainSummary {
    pub total_subdomains: usize,
    pub unique_subdomains: usize,
    pub sources_used: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VulnScanOutput {
    pub findings: Vec<VulnFinding>,
    pub by_severity: HashMap<String, usize>,
    pub by_template: HashMap<String, usize>,
    pub by_tag: HashMap<String, usize>,
    pub summary: VulnSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VulnFinding {
    pub template_id: String,
    pub template_name: String,
    pub severity: String,
    pub r#type: String,
    pub host: String,
    pub matched_at: String,
    pub description: String,
    pub tags: Vec<String>,
    pub reference: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VulnSummary {
    pub total_findings: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}
