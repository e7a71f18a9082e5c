//! AUTO-UPDATE: refresh a tool's vulnerability/signature database.

use tokio::process::Command;

use voidwave_core::SessionAccessor;

use crate::handler::{AutoFixHandler, FixOutcome};

struct UpdateSource {
    name: &'static str,
    command: &'static [&'static str],
    check_tool: &'static str,
    description: &'static str,
}

const UPDATE_SOURCES: &[UpdateSource] = &[
    UpdateSource {
        name: "nuclei-templates",
        command: &["nuclei", "-update-templates"],
        check_tool: "nuclei",
        description: "nuclei vulnerability templates",
    },
    UpdateSource {
        name: "nmap-scripts",
        command: &["nmap", "--script-updatedb"],
        check_tool: "nmap",
        description: "nmap NSE scripts database",
    },
    UpdateSource {
        name: "exploitdb",
        command: &["searchsploit", "-u"],
        check_tool: "searchsploit",
        description: "exploit database",
    },
];

pub struct UpdateHandler {
    pub source: String,
}

impl UpdateHandler {
    fn config(&self) -> Option<&'static UpdateSource> {
        UPDATE_SOURCES.iter().find(|s| s.name == self.source)
    }
}

#[async_trait::async_trait]
impl AutoFixHandler for UpdateHandler {
    async fn can_fix(&self, _session: &dyn SessionAccessor) -> bool {
        self.config().is_some_and(|c| which::which(c.check_tool).is_ok())
    }

    async fn fix(&self, _session: &dyn SessionAccessor) -> FixOutcome {
        let Some(config) = self.config() else {
            return FixOutcome::Failed { reason: format!("unknown update source '{}'", self.source) };
        };
        let status = Command::new(config.command[0]).args(&config.command[1..]).status().await;
        match status {
            Ok(status) if status.success() => FixOutcome::Fixed,
            Ok(status) => FixOutcome::Failed { reason: format!("update exited with {status}") },
            Err(e) => FixOutcome::Failed { reason: e.to_string() },
        }
    }

    fn ui_prompt(&self) -> String {
        match self.config() {
            Some(config) => format!("update {}?", config.description),
            None => format!("update {}?", self.source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sources_have_a_runnable_command() {
        let source = UPDATE_SOURCES.iter().find(|s| s.name == "nuclei-templates").unwrap();
        assert!(!source.command.is_empty());
    }
}
