//! AUTO-GUIDE: display manual remediation steps for situations no
//! automated fix can resolve (missing hardware, GUI-only tools, …).
//! Always `RequiresManual` — guidance never fixes anything by itself.

use voidwave_core::SessionAccessor;

use crate::handler::{AutoFixHandler, FixOutcome};

pub struct Guide {
    pub title: &'static str,
    pub steps: &'static [&'static str],
}

pub const GUIDES: &[(&str, Guide)] = &[
    (
        "wireless_adapter",
        Guide {
            title: "wireless adapter required",
            steps: &[
                "connect a monitor-mode capable USB WiFi adapter",
                "install drivers if required (rtl8812au, rtl8814au)",
                "rescan to detect the adapter",
            ],
        },
    ),
    (
        "gpu_hashcat",
        Guide {
            title: "GPU required for hashcat",
            steps: &["install GPU drivers (NVIDIA: CUDA, AMD: ROCm)", "verify with: hashcat -I"],
        },
    ),
    (
        "metasploit_db",
        Guide {
            title: "metasploit database setup",
            steps: &["initialize database: msfdb init", "start PostgreSQL: systemctl start postgresql"],
        },
    ),
    (
        "gui_tool",
        Guide {
            title: "GUI tool required",
            steps: &["this tool requires a graphical interface", "connect via VNC or X11 forwarding if remote"],
        },
    ),
];

pub struct GuideHandler {
    pub guide_type: String,
}

impl GuideHandler {
    fn guide(&self) -> Option<&'static Guide> {
        GUIDES.iter().find(|(name, _)| *name == self.guide_type).map(|(_, guide)| guide)
    }

    pub fn steps(&self) -> &'static [&'static str] {
        self.guide().map(|g| g.steps).unwrap_or(&[])
    }
}

#[async_trait::async_trait]
impl AutoFixHandler for GuideHandler {
    async fn can_fix(&self, _session: &dyn SessionAccessor) -> bool {
        false
    }

    async fn fix(&self, _session: &dyn SessionAccessor) -> FixOutcome {
        FixOutcome::RequiresManual { prompt: self.ui_prompt() }
    }

    fn ui_prompt(&self) -> String {
        self.guide().map(|g| g.title.to_string()).unwrap_or_else(|| "manual steps required".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_guide_exposes_its_steps() {
        let handler = GuideHandler { guide_type: "gpu_hashcat".to_string() };
        assert!(!handler.steps().is_empty());
    }
}
