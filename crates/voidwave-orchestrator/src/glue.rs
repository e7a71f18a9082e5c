//! Wires the event bus to the persistence and UI collaborators (spec
//! §1, overview component 12). Grounded on the teacher's default
//! handler registration pattern, adapted: the bus only runs
//! synchronous handlers, so each default handler spawns a detached
//! task to call the async collaborator.

use std::sync::Arc;

use voidwave_events::{EventName, VoidwaveEventBus};

use crate::hooks::{PersistenceSink, UiBridge};

/// Owns the shared collaborator handles and registers the default
/// event-bus wiring between them.
pub struct Orchestrator {
    pub events: Arc<VoidwaveEventBus>,
    persistence: Arc<dyn PersistenceSink>,
    ui: Arc<dyn UiBridge>,
}

impl Orchestrator {
    pub fn new(events: Arc<VoidwaveEventBus>, persistence: Arc<dyn PersistenceSink>, ui: Arc<dyn UiBridge>) -> Self {
        Self { events, persistence, ui }
    }

    /// Register the default handlers. Safe to call once per bus.
    pub fn register_default_handlers(&self) {
        let persistence = self.persistence.clone();
        self.events.on(EventName::DiscoveryVulnerability, move |event| {
            let persistence = persistence.clone();
            let payload = event.payload.clone();
            tracing::warn!(
                severity = payload.get("severity").and_then(|v| v.as_str()).unwrap_or("unknown"),
                id = payload.get("id").and_then(|v| v.as_str()).unwrap_or("unknown"),
                "vulnerability found"
            );
            tokio::spawn(async move { persistence.record_vulnerability(&payload).await });
            Ok(())
        });

        let persistence = self.persistence.clone();
        self.events.on(EventName::WirelessCracked, move |event| {
            let persistence = persistence.clone();
            let payload = event.payload.clone();
            tracing::info!(cred_type = payload.get("type").and_then(|v| v.as_str()).unwrap_or("unknown"), "credential cracked");
            tokio::spawn(async move { persistence.store_credential(&payload).await });
            Ok(())
        });

        let persistence = self.persistence.clone();
        self.events.on(EventName::WirelessHandshake, move |event| {
            let persistence = persistence.clone();
            let payload = event.payload.clone();
            tracing::info!(
                essid = payload.get("essid").and_then(|v| v.as_str()).unwrap_or(""),
                bssid = payload.get("bssid").and_then(|v| v.as_str()).unwrap_or(""),
                "handshake captured"
            );
            tokio::spawn(async move { persistence.store_handshake(&payload).await });
            Ok(())
        });

        let ui = self.ui.clone();
        self.events.on(EventName::UiStatus, move |event| {
            let ui = ui.clone();
            let payload = event.payload.clone();
            tokio::spawn(async move { ui.status(&payload).await });
            Ok(())
        });

        let ui = self.ui.clone();
        self.events.on(EventName::UiNotification, move |event| {
            let ui = ui.clone();
            let payload = event.payload.clone();
            tokio::spawn(async move { ui.notify(&payload).await });
            Ok(())
        });

        tracing::info!("registered default orchestrator handlers");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{NullPersistenceSink, NullUiBridge};
    use serde_json::{Map, Value};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FlagSink {
        seen: Arc<AtomicBool>,
    }

    #[async_trait::async_trait]
    impl PersistenceSink for FlagSink {
        async fn record_vulnerability(&self, _data: &Map<String, Value>) {
            self.seen.store(true, Ordering::SeqCst);
        }
        async fn store_credential(&self, _data: &Map<String, Value>) {}
        async fn store_handshake(&self, _data: &Map<String, Value>) {}
    }

    #[tokio::test]
    async fn vulnerability_event_reaches_the_persistence_sink() {
        let events = Arc::new(VoidwaveEventBus::default());
        let seen = Arc::new(AtomicBool::new(false));
        let sink = Arc::new(FlagSink { seen: seen.clone() });
        let orchestrator = Orchestrator::new(events.clone(), sink, Arc::new(NullUiBridge));
        orchestrator.register_default_handlers();

        events.emit(EventName::DiscoveryVulnerability, Map::from_iter([("severity".to_string(), Value::from("high"))]));
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert!(seen.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn default_handlers_do_not_panic_with_null_collaborators() {
        let events = Arc::new(VoidwaveEventBus::default());
        let orchestrator = Orchestrator::new(events.clone(), Arc::new(NullPersistenceSink), Arc::new(NullUiBridge));
        orchestrator.register_default_handlers();
        events.emit(EventName::UiStatus, Map::new());
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}
