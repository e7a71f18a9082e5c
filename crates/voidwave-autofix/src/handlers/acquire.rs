//! AUTO-ACQUIRE: acquiring a missing input (a target, a handshake
//! capture, a wordlist selection, …) happens through operator
//! interaction, not headlessly. This resolves the open question of
//! what AUTO-ACQUIRE's "subflow" means in a host without a TUI: it is
//! always `RequiresManual`, carrying enough detail for the host to
//! decide how to prompt (or to drive its own subflow) without this
//! crate knowing anything about TUI screens.

use voidwave_core::SessionAccessor;

use crate::handler::{AutoFixHandler, FixOutcome};

fn prompt_for(input_type: &str) -> String {
    match input_type {
        "target" | "target_wifi" => "no target selected. scan for networks?",
        "target_host" => "no host target specified. enter target IP/hostname?",
        "client" => "no client selected. scan for clients?",
        "handshake" => "no handshake captured. capture now?",
        "pmkid" => "no PMKID captured. capture now?",
        "wordlist" => "no wordlist selected. download default?",
        "capture_file" => "no capture file selected. browse for file?",
        "hash_file" => "no hash file selected. browse for file?",
        other => return format!("acquire {other}?"),
    }
    .to_string()
}

pub struct AcquireHandler {
    pub input_type: String,
}

#[async_trait::async_trait]
impl AutoFixHandler for AcquireHandler {
    async fn can_fix(&self, _session: &dyn SessionAccessor) -> bool {
        true
    }

    async fn fix(&self, _session: &dyn SessionAccessor) -> FixOutcome {
        FixOutcome::RequiresManual { prompt: prompt_for(&self.input_type) }
    }

    fn ui_prompt(&self) -> String {
        prompt_for(&self.input_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidwave_core::EmptySession;

    #[tokio::test]
    async fn always_requires_manual_interaction() {
        let handler = AcquireHandler { input_type: "handshake".to_string() };
        let outcome = handler.fix(&EmptySession).await;
        assert!(matches!(outcome, FixOutcome::RequiresManual { .. }));
    }
}
