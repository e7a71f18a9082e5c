//! AUTO-KEYS: API key lookup/storage for optional OSINT integrations.
//! Entering a key is always a manual, TUI-driven action; this module's
//! job is resolving whether one is already configured.

use std::path::PathBuf;

use directories::BaseDirs;

use voidwave_core::SessionAccessor;

use crate::handler::{AutoFixHandler, FixOutcome};

struct ApiKeyConfig {
    service: &'static str,
    env_var: &'static str,
    description: &'static str,
}

const API_KEYS: &[ApiKeyConfig] = &[
    ApiKeyConfig { service: "shodan", env_var: "SHODAN_API_KEY", description: "Shodan search engine API" },
    ApiKeyConfig { service: "virustotal", env_var: "VT_API_KEY", description: "VirusTotal API" },
    ApiKeyConfig { service: "wpscan", env_var: "WPSCAN_API_TOKEN", description: "WPScan vulnerability database" },
    ApiKeyConfig { service: "projectdiscovery", env_var: "PDCP_API_KEY", description: "ProjectDiscovery cloud platform" },
    ApiKeyConfig { service: "hunter", env_var: "HUNTER_API_KEY", description: "Hunter.io email finder" },
];

fn keys_dir() -> PathBuf {
    BaseDirs::new().map(|d| d.home_dir().join(".voidwave/keys")).unwrap_or_else(|| PathBuf::from("/tmp/voidwave-keys"))
}

pub fn is_configured(service: &str) -> bool {
    let Some(config) = API_KEYS.iter().find(|c| c.service == service) else {
        return false;
    };
    if std::env::var(config.env_var).is_ok() {
        return true;
    }
    keys_dir().join(format!("{service}.key")).exists()
}

pub fn get_key(service: &str) -> Option<String> {
    let config = API_KEYS.iter().find(|c| c.service == service)?;
    if let Ok(value) = std::env::var(config.env_var) {
        return Some(value);
    }
    std::fs::read_to_string(keys_dir().join(format!("{service}.key"))).ok().map(|s| s.trim().to_string())
}

pub struct KeysHandler {
    pub service: String,
}

#[async_trait::async_trait]
impl AutoFixHandler for KeysHandler {
    async fn can_fix(&self, _session: &dyn SessionAccessor) -> bool {
        API_KEYS.iter().any(|c| c.service == self.service)
    }

    async fn fix(&self, _session: &dyn SessionAccessor) -> FixOutcome {
        FixOutcome::RequiresManual { prompt: self.ui_prompt() }
    }

    fn ui_prompt(&self) -> String {
        match API_KEYS.iter().find(|c| c.service == self.service) {
            Some(config) => format!("configure {} API key ({})?", self.service, config.description),
            None => format!("configure {} API key?", self.service),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_service_with_no_env_var_or_file_is_not_configured() {
        assert!(!is_configured("definitely-not-a-real-service"));
    }
}
