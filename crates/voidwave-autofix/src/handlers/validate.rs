//! AUTO-VALIDATE: input validation and safety checks on target-like
//! inputs before a chain is allowed to run against them.

use std::net::IpAddr;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use voidwave_core::SessionAccessor;

use crate::handler::{AutoFixHandler, FixOutcome};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub error: Option<String>,
    pub warning: Option<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

static MAC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})$").expect("valid regex"));
static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://[^\s/$.?#].[^\s]*$").expect("valid regex"));
static DOMAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z]{2,})+$").expect("valid regex"));
static HASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{16,}$").expect("valid regex"));

pub fn validate(input_type: &str, value: &str) -> ValidationResult {
    match input_type {
        "ip" | "ip_address" => validate_ip(value),
        "cidr" => validate_cidr(value),
        "bssid" | "mac" => validate_mac(value),
        "url" => validate_url(value),
        "domain" => validate_domain(value),
        "port" => validate_port(value),
        "port_range" => validate_port_range(value),
        "hash" => validate_hash(value),
        _ => ValidationResult::default(),
    }
}

fn validate_ip(value: &str) -> ValidationResult {
    match IpAddr::from_str(value) {
        Ok(_) => ValidationResult::default(),
        Err(_) => ValidationResult { error: Some("invalid IP address format".to_string()), warning: None },
    }
}

fn validate_cidr(value: &str) -> ValidationResult {
    let Some((addr, prefix)) = value.split_once('/') else {
        return ValidationResult { error: Some("invalid CIDR notation".to_string()), warning: None };
    };
    let Ok(ip) = IpAddr::from_str(addr) else {
        return ValidationResult { error: Some("invalid CIDR notation".to_string()), warning: None };
    };
    let Ok(prefix_len) = prefix.parse::<u32>() else {
        return ValidationResult { error: Some("invalid CIDR notation".to_string()), warning: None };
    };

    let bits = if ip.is_ipv4() { 32 } else { 128 };
    if prefix_len > bits {
        return ValidationResult { error: Some("invalid CIDR notation".to_string()), warning: None };
    }
    if prefix_len == 0 {
        return ValidationResult { error: Some("cannot target entire internet".to_string()), warning: None };
    }

    let host_bits = bits - prefix_len;
    let num_addresses: u64 = 1u64 << host_bits.min(63);
    let warning = if num_addresses > 65536 { Some(format!("very broad scope: {num_addresses} addresses")) } else { None };
    ValidationResult { error: None, warning }
}

fn validate_mac(value: &str) -> ValidationResult {
    if MAC.is_match(value) {
        ValidationResult::default()
    } else {
        ValidationResult { error: Some("invalid MAC address format (expected XX:XX:XX:XX:XX:XX)".to_string()), warning: None }
    }
}

fn validate_url(value: &str) -> ValidationResult {
    if URL.is_match(value) {
        ValidationResult::default()
    } else {
        ValidationResult { error: Some("invalid URL format".to_string()), warning: None }
    }
}

fn validate_domain(value: &str) -> ValidationResult {
    if DOMAIN.is_match(value) {
        ValidationResult::default()
    } else {
        ValidationResult { error: Some("invalid domain format".to_string()), warning: None }
    }
}

fn validate_port(value: &str) -> ValidationResult {
    match value.parse::<u32>() {
        Ok(port) if (1..=65535).contains(&port) => ValidationResult::default(),
        Ok(_) => ValidationResult { error: Some("port must be between 1 and 65535".to_string()), warning: None },
        Err(_) => ValidationResult { error: Some("port must be a number".to_string()), warning: None },
    }
}

fn validate_port_range(value: &str) -> ValidationResult {
    let Some((start, end)) = value.split_once('-') else {
        return validate_port(value);
    };
    let start = validate_port(start);
    if !start.is_valid() {
        return start;
    }
    validate_port(end)
}

fn validate_hash(value: &str) -> ValidationResult {
    if HASH.is_match(value) {
        ValidationResult::default()
    } else {
        ValidationResult { error: Some("invalid hash format".to_string()), warning: None }
    }
}

pub struct ValidateHandler {
    pub input_type: String,
    pub value: String,
}

#[async_trait::async_trait]
impl AutoFixHandler for ValidateHandler {
    async fn can_fix(&self, _session: &dyn SessionAccessor) -> bool {
        false
    }

    async fn fix(&self, _session: &dyn SessionAccessor) -> FixOutcome {
        let result = validate(&self.input_type, &self.value);
        match result.error {
            Some(error) => FixOutcome::Failed { reason: error },
            None => FixOutcome::Fixed,
        }
    }

    fn ui_prompt(&self) -> String {
        let result = validate(&self.input_type, &self.value);
        match (result.error, result.warning) {
            (Some(e), _) => format!("invalid {}: {e}", self.input_type),
            (None, Some(w)) => format!("warning for {}: {w}", self.input_type),
            (None, None) => format!("{} is valid.", self.input_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_the_entire_internet_as_a_cidr_target() {
        let result = validate("cidr", "0.0.0.0/0");
        assert!(!result.is_valid());
    }

    #[test]
    fn warns_on_very_broad_but_valid_cidr_scope() {
        let result = validate("cidr", "10.0.0.0/8");
        assert!(result.is_valid());
        assert!(result.warning.is_some());
    }

    #[test]
    fn validates_mac_and_rejects_malformed_addresses() {
        assert!(validate("mac", "AA:BB:CC:DD:EE:FF").is_valid());
        assert!(!validate("mac", "not-a-mac").is_valid());
    }

    #[test]
    fn validates_port_bounds() {
        assert!(validate("port", "8080").is_valid());
        assert!(!validate("port", "70000").is_valid());
    }
}
