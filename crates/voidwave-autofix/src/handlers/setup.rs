//! AUTO-SETUP: create the working directory tree and a default
//! configuration file. `certs`/`portal`/`hostapd`/`dnsmasq` setup
//! kinds are recognised but only create their target directory — the
//! original's heavier asset generation (cert signing, portal HTML,
//! hostapd.conf templating) is out of scope for this crate's
//! structured-fix contract.

use std::path::{Path, PathBuf};

use voidwave_core::SessionAccessor;

use crate::handler::{AutoFixHandler, FixOutcome};

const DIRECTORY_TREE: &[&str] = &[
    "logs", "reports", "captures/wifi", "captures/wired", "loot", "scans", "portals", "certs", "wordlists",
    "templates", "sessions", "configs", "temp",
];

const DEFAULT_CONFIG: &str = r#"[general]
theme = "dark"
log_level = "info"
output_dir = "/voidwave"

[scanning]
default_timeout = 300
max_threads = 50

[credentials]
wordlist = "/voidwave/wordlists/rockyou.txt"
"#;

fn base_dir() -> PathBuf {
    PathBuf::from("/voidwave")
}

pub struct SetupHandler {
    pub setup_type: String,
}

impl SetupHandler {
    fn setup_directories(&self) -> Result<(), String> {
        let base = base_dir();
        for dir in DIRECTORY_TREE {
            std::fs::create_dir_all(base.join(dir)).map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    fn setup_config(&self) -> Result<(), String> {
        let path = base_dir().join("configs/settings.toml");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        std::fs::write(path, DEFAULT_CONFIG).map_err(|e| e.to_string())
    }

    fn setup_directory_only(&self, subdir: &str) -> Result<(), String> {
        std::fs::create_dir_all(base_dir().join(subdir)).map_err(|e| e.to_string())
    }
}

const KNOWN_SETUP_TYPES: &[&str] = &["directories", "config", "certs", "portal", "hostapd", "dnsmasq"];

#[async_trait::async_trait]
impl AutoFixHandler for SetupHandler {
    async fn can_fix(&self, _session: &dyn SessionAccessor) -> bool {
        KNOWN_SETUP_TYPES.contains(&self.setup_type.as_str())
    }

    async fn fix(&self, _session: &dyn SessionAccessor) -> FixOutcome {
        let result = match self.setup_type.as_str() {
            "directories" => self.setup_directories(),
            "config" => self.setup_config(),
            "certs" => self.setup_directory_only("certs"),
            "portal" => self.setup_directory_only("portals"),
            "hostapd" => self.setup_directory_only("configs/hostapd"),
            "dnsmasq" => self.setup_directory_only("configs/dnsmasq"),
            other => return FixOutcome::Failed { reason: format!("unknown setup type '{other}'") },
        };
        match result {
            Ok(()) => FixOutcome::Fixed,
            Err(reason) => FixOutcome::Failed { reason },
        }
    }

    fn ui_prompt(&self) -> String {
        match self.setup_type.as_str() {
            "directories" => "create VOIDWAVE directory structure?".to_string(),
            "config" => "create default configuration file?".to_string(),
            "certs" => "prepare certificate directory?".to_string(),
            "portal" => "prepare captive portal asset directory?".to_string(),
            "hostapd" => "prepare hostapd configuration directory?".to_string(),
            "dnsmasq" => "prepare dnsmasq configuration directory?".to_string(),
            other => format!("setup {other}?"),
        }
    }
}

pub fn config_exists() -> bool {
    Path::new("/voidwave/configs/settings.toml").exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_setup_types_cover_the_directory_tree_entries() {
        assert!(KNOWN_SETUP_TYPES.contains(&"directories"));
        assert!(DIRECTORY_TREE.contains(&"wordlists"));
    }
}
