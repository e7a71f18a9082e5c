use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Closed event-name vocabulary (spec §6, "Event vocabulary"). Mirrors
/// the original's `Events(str, Enum)` but as a Rust enum so emitters
/// and listeners can't typo a name past the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    ToolStarted,
    ToolOutput,
    ToolProgress,
    ToolCompleted,
    ToolFailed,
    ToolStopAll,
    TaskStarted,
    TaskProgress,
    TaskCompleted,
    DiscoveryHost,
    DiscoveryService,
    DiscoveryVulnerability,
    WirelessNetwork,
    WirelessHandshake,
    WirelessPmkid,
    WirelessCracked,
    SessionStarted,
    SessionUpdated,
    SessionEnded,
    UiStatus,
    UiNotification,
}

impl EventName {
    /// The wire name used on the bus and in history (spec's
    /// dotted event-vocabulary strings, e.g. `"tool.started"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::ToolStarted => "tool.started",
            EventName::ToolOutput => "tool.output",
            EventName::ToolProgress => "tool.progress",
            EventName::ToolCompleted => "tool.completed",
            EventName::ToolFailed => "tool.failed",
            EventName::ToolStopAll => "tool.stop_all",
            EventName::TaskStarted => "task.started",
            EventName::TaskProgress => "task.progress",
            EventName::TaskCompleted => "task.completed",
            EventName::DiscoveryHost => "discovery.host",
            EventName::DiscoveryService => "discovery.service",
            EventName::DiscoveryVulnerability => "discovery.vulnerability",
            EventName::WirelessNetwork => "wireless.network",
            EventName::WirelessHandshake => "wireless.handshake",
            EventName::WirelessPmkid => "wireless.pmkid",
            EventName::WirelessCracked => "wireless.cracked",
            EventName::SessionStarted => "session.started",
            EventName::SessionUpdated => "session.updated",
            EventName::SessionEnded => "session.ended",
            EventName::UiStatus => "ui.status",
            EventName::UiNotification => "ui.notification",
        }
    }

    pub fn from_str(name: &str) -> Option<Self> {
        ALL.iter().copied().find(|e| e.as_str() == name)
    }
}

const ALL: &[EventName] = &[
    EventName::ToolStarted,
    EventName::ToolOutput,
    EventName::ToolProgress,
    EventName::ToolCompleted,
    EventName::ToolFailed,
    EventName::ToolStopAll,
    EventName::TaskStarted,
    EventName::TaskProgress,
    EventName::TaskCompleted,
    EventName::DiscoveryHost,
    EventName::DiscoveryService,
    EventName::DiscoveryVulnerability,
    EventName::WirelessNetwork,
    EventName::WirelessHandshake,
    EventName::WirelessPmkid,
    EventName::WirelessCracked,
    EventName::SessionStarted,
    EventName::SessionUpdated,
    EventName::SessionEnded,
    EventName::UiStatus,
    EventName::UiNotification,
];

/// A single emitted event: a closed name plus a free-form payload map.
/// Contractual payload keys (`tool`, `target`, `exit_code`, `duration`,
/// `line`, `level`, `step_id`, `chain_id`) are left to callers to set —
/// the bus itself doesn't validate payload shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub name: EventName,
    pub payload: Map<String, Value>,
}

impl Event {
    pub fn new(name: EventName, payload: Map<String, Value>) -> Self {
        Self { name, payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_event_name_round_trips_through_its_wire_string() {
        for event in ALL {
            assert_eq!(EventName::from_str(event.as_str()), Some(*event));
        }
    }

    #[test]
    fn unknown_wire_name_resolves_to_none() {
        assert_eq!(EventName::from_str("not.a.real.event"), None);
    }

    #[test]
    fn event_names_are_dotted_lowercase() {
        for event in ALL {
            let s = event.as_str();
            assert!(s.contains('.'));
            assert!(s.chars().all(|c| c.is_ascii_lowercase() || c == '.' || c == '_'));
        }
    }
}
