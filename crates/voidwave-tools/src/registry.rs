//! Maps a requested tool name to its closed [`Tool`] variant and runs
//! it end to end (spec §6, "Tool-registry collaborator contract").

use std::time::Duration;

use serde_json::Map;

use voidwave_core::{CoreResult, ToolOutcome};

use crate::runner;
use crate::spec::Tool;

#[derive(Debug, Default)]
pub struct ToolRegistry;

impl ToolRegistry {
    pub fn new() -> Self {
        Self
    }

    pub fn get_instance(&self, name: &str) -> Tool {
        Tool::for_name(name)
    }

    pub async fn execute(
        &self,
        name: &str,
        target: &str,
        options: &Map<String, serde_json::Value>,
        timeout_duration: Duration,
    ) -> CoreResult<ToolOutcome> {
        let tool = self.get_instance(name);
        let argv = tool.build_command(name, target, options);
        runner::run(&argv, timeout_duration, |_line, _class| {}, |raw| tool.parse_output(raw)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_tool_instance_by_name() {
        let registry = ToolRegistry::new();
        assert_eq!(registry.get_instance("nmap"), Tool::Nmap);
        assert_eq!(registry.get_instance("unknown-tool"), Tool::Generic);
    }
}
