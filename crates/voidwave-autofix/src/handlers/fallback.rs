//! AUTO-FALLBACK: switch to an alternate tool when the primary isn't
//! installed. `FALLBACK_CHAINS` mirrors a representative subset of the
//! original's table.

use std::sync::Mutex;

use voidwave_core::SessionAccessor;

use crate::handler::{AutoFixHandler, FixOutcome};

pub const FALLBACK_CHAINS: &[(&str, &[&str])] = &[
    ("nmap", &["rustscan", "masscan"]),
    ("hashcat", &["john"]),
    ("aircrack-ng", &["hashcat"]),
    ("gobuster", &["ffuf"]),
    ("subfinder", &["amass"]),
    ("nikto", &["whatweb"]),
    ("wpscan", &["nuclei"]),
];

pub fn chain_for(primary: &str) -> &'static [&'static str] {
    FALLBACK_CHAINS.iter().find(|(name, _)| *name == primary).map(|(_, chain)| *chain).unwrap_or(&[])
}

pub fn first_available(primary: &str) -> Option<&'static str> {
    chain_for(primary).iter().find(|tool| which::which(tool).is_ok()).copied()
}

#[derive(Default)]
pub struct FallbackHandler {
    pub primary: String,
    selected: Mutex<Option<String>>,
}

impl FallbackHandler {
    pub fn new(primary: impl Into<String>) -> Self {
        Self { primary: primary.into(), selected: Mutex::new(None) }
    }

    pub fn selected_tool(&self) -> Option<String> {
        self.selected.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AutoFixHandler for FallbackHandler {
    async fn can_fix(&self, _session: &dyn SessionAccessor) -> bool {
        first_available(&self.primary).is_some()
    }

    async fn fix(&self, _session: &dyn SessionAccessor) -> FixOutcome {
        match first_available(&self.primary) {
            Some(tool) => {
                *self.selected.lock().unwrap() = Some(tool.to_string());
                FixOutcome::Fixed
            }
            None => FixOutcome::Failed { reason: format!("no fallback for '{}' is installed", self.primary) },
        }
    }

    fn ui_prompt(&self) -> String {
        match first_available(&self.primary) {
            Some(tool) => format!("'{}' not found. use '{}' instead?", self.primary, tool),
            None => format!("'{}' not found. check for alternatives?", self.primary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_for_unknown_primary_is_empty() {
        assert!(chain_for("some-unheard-of-tool").is_empty());
    }

    #[test]
    fn chain_for_hashcat_includes_john() {
        assert_eq!(chain_for("hashcat"), &["john"]);
    }
}
