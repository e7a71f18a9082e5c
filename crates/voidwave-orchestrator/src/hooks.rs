//! Out-of-scope collaborator interfaces (spec §1): SQLite persistence
//! of audit logs / loot, and the TUI-facing status bridge. The core
//! only needs a handle to call into these; it never implements them.

use async_trait::async_trait;
use serde_json::Map;
use serde_json::Value;

/// Durable storage for audit-worthy events and captured loot. A real
/// implementation lives outside this crate (SQLite + encrypted loot
/// storage, per spec); this trait is the seam the orchestrator wires
/// events through.
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    async fn record_vulnerability(&self, data: &Map<String, Value>);
    async fn store_credential(&self, data: &Map<String, Value>);
    async fn store_handshake(&self, data: &Map<String, Value>);
}

/// Forwards user-facing status and notification events to the TUI.
#[async_trait]
pub trait UiBridge: Send + Sync {
    async fn status(&self, data: &Map<String, Value>);
    async fn notify(&self, data: &Map<String, Value>);
}

/// No-op implementations used when no collaborator is wired yet
/// (tests, or a headless run).
pub struct NullPersistenceSink;

#[async_trait]
impl PersistenceSink for NullPersistenceSink {
    async fn record_vulnerability(&self, _data: &Map<String, Value>) {}
    async fn store_credential(&self, _data: &Map<String, Value>) {}
    async fn store_handshake(&self, _data: &Map<String, Value>) {}
}

pub struct NullUiBridge;

#[async_trait]
impl UiBridge for NullUiBridge {
    async fn status(&self, _data: &Map<String, Value>) {}
    async fn notify(&self, _data: &Map<String, Value>) {}
}
