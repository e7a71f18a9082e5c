//! AUTO-DATA: download a named wordlist into the local data directory.

use std::path::PathBuf;

use directories::BaseDirs;
use tokio::process::Command;

use voidwave_core::SessionAccessor;

use crate::handler::{AutoFixHandler, FixOutcome};

struct DataSource {
    name: &'static str,
    url: &'static str,
    filename: &'static str,
    description: &'static str,
}

const DATA_SOURCES: &[DataSource] = &[
    DataSource {
        name: "rockyou",
        url: "https://github.com/brannondorsey/naive-hashcat/releases/download/data/rockyou.txt",
        filename: "rockyou.txt",
        description: "common password wordlist",
    },
    DataSource {
        name: "common",
        url: "https://raw.githubusercontent.com/v0re/dirb/master/wordlists/common.txt",
        filename: "common.txt",
        description: "common directory names",
    },
    DataSource {
        name: "subdomains",
        url: "https://raw.githubusercontent.com/danielmiessler/SecLists/master/Discovery/DNS/subdomains-top1million-5000.txt",
        filename: "subdomains.txt",
        description: "common subdomain names",
    },
];

fn wordlists_dir() -> PathBuf {
    BaseDirs::new().map(|d| d.home_dir().join(".voidwave/wordlists")).unwrap_or_else(|| PathBuf::from("/tmp/voidwave-wordlists"))
}

pub struct DataHandler {
    pub data_type: String,
}

#[async_trait::async_trait]
impl AutoFixHandler for DataHandler {
    async fn can_fix(&self, _session: &dyn SessionAccessor) -> bool {
        which::which("curl").is_ok() || which::which("wget").is_ok()
    }

    async fn fix(&self, _session: &dyn SessionAccessor) -> FixOutcome {
        let Some(source) = DATA_SOURCES.iter().find(|s| s.name == self.data_type) else {
            return FixOutcome::Failed { reason: format!("unknown data source '{}'", self.data_type) };
        };

        let dest_dir = wordlists_dir();
        if let Err(e) = std::fs::create_dir_all(&dest_dir) {
            return FixOutcome::Failed { reason: e.to_string() };
        }
        let dest = dest_dir.join(source.filename);

        let status = if which::which("curl").is_ok() {
            Command::new("curl").args(["-L", "-o"]).arg(&dest).arg(source.url).status().await
        } else {
            Command::new("wget").arg("-O").arg(&dest).arg(source.url).status().await
        };

        match status {
            Ok(status) if status.success() && dest.exists() => FixOutcome::Fixed,
            Ok(status) => FixOutcome::Failed { reason: format!("download exited with {status}") },
            Err(e) => FixOutcome::Failed { reason: e.to_string() },
        }
    }

    fn ui_prompt(&self) -> String {
        match DATA_SOURCES.iter().find(|s| s.name == self.data_type) {
            Some(source) => format!("download {} ({})?", source.name, source.description),
            None => format!("download {}?", self.data_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sources_resolve_to_a_filename() {
        let source = DATA_SOURCES.iter().find(|s| s.name == "rockyou").unwrap();
        assert_eq!(source.filename, "rockyou.txt");
    }
}
