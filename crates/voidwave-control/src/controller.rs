//! Tracks in-flight tool executions and implements cancel / stop-all
//! (spec §4.9). Grounded on the teacher's process-registry shape, but
//! since tool execution here is encapsulated in a Tokio task rather
//! than a raw child handle, a running operation is represented by its
//! [`tokio::task::AbortHandle`] — aborting it drops the task's child
//! process, which is spawned `kill_on_drop`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tokio::task::AbortHandle;

use voidwave_events::{EventName, VoidwaveEventBus};

#[derive(Debug, Clone)]
pub struct RunningProcess {
    pub process_id: String,
    pub tool_name: String,
    pub target: Option<String>,
    pub started_at: DateTime<Utc>,
}

struct Entry {
    info: RunningProcess,
    abort: AbortHandle,
}

#[derive(Debug, Default, Clone)]
pub struct StopAllResult {
    pub cancelled: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Centralized control over every running tool invocation: register on
/// spawn, unregister on natural completion, cancel one or all.
pub struct ExecutionController {
    events: Arc<VoidwaveEventBus>,
    processes: Mutex<HashMap<String, Entry>>,
    stop_all_in_progress: std::sync::atomic::AtomicBool,
}

impl ExecutionController {
    pub fn new(events: Arc<VoidwaveEventBus>) -> Self {
        Self { events, processes: Mutex::new(HashMap::new()), stop_all_in_progress: std::sync::atomic::AtomicBool::new(false) }
    }

    /// Wire `tool.stop_all` events to this controller's `stop_all`.
    /// The bus only supports synchronous handlers, so the handler
    /// spawns the async stop-all as a detached task.
    pub fn listen_for_stop_all(self: &Arc<Self>) {
        let controller = Arc::clone(self);
        self.events.on(EventName::ToolStopAll, move |_event| {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move {
                controller.stop_all(DEFAULT_GRACE_SECS).await;
            });
            Ok(())
        });
    }

    pub async fn register(&self, process_id: impl Into<String>, tool_name: impl Into<String>, target: Option<String>, abort: AbortHandle) {
        let process_id = process_id.into();
        let info = RunningProcess { process_id: process_id.clone(), tool_name: tool_name.into(), target, started_at: Utc::now() };
        self.processes.lock().await.insert(process_id, Entry { info, abort });
    }

    pub async fn unregister(&self, process_id: &str) {
        self.processes.lock().await.remove(process_id);
    }

    /// Cancel a single process. `grace` is accepted for API symmetry
    /// with the original's terminate-then-kill window, but since abort
    /// always drops the underlying `kill_on_drop` child immediately,
    /// there is no intermediate graceful phase to wait out here.
    pub async fn cancel(&self, process_id: &str, _grace: std::time::Duration) -> bool {
        let entry = self.processes.lock().await.remove(process_id);
        let Some(entry) = entry else {
            return false;
        };

        entry.abort.abort();
        self.events.emit(
            EventName::ToolFailed,
            payload([
                ("tool", Value::from(entry.info.tool_name.clone())),
                ("process_id", Value::from(process_id.to_string())),
                ("error", Value::from("Cancelled by user")),
            ]),
        );
        true
    }

    pub async fn stop_all(&self, grace: std::time::Duration) -> StopAllResult {
        if self.stop_all_in_progress.swap(true, std::sync::atomic::Ordering::SeqCst) {
            tracing::warn!("stop all already in progress");
            return StopAllResult::default();
        }

        let process_ids: Vec<String> = self.processes.lock().await.keys().cloned().collect();
        let mut result = StopAllResult::default();

        for process_id in process_ids {
            if self.cancel(&process_id, grace).await {
                result.cancelled += 1;
            } else {
                result.failed += 1;
            }
        }

        self.events.emit(
            EventName::UiStatus,
            payload([
                ("action", Value::from("stop_all_completed")),
                ("cancelled", Value::from(result.cancelled)),
                ("failed", Value::from(result.failed)),
            ]),
        );

        self.stop_all_in_progress.store(false, std::sync::atomic::Ordering::SeqCst);
        result
    }

    pub async fn running_count(&self) -> usize {
        self.processes.lock().await.len()
    }

    pub async fn running_tools(&self) -> Vec<RunningProcess> {
        self.processes.lock().await.values().map(|e| e.info.clone()).collect()
    }

    pub async fn is_tool_running(&self, tool_name: &str) -> bool {
        self.processes.lock().await.values().any(|e| e.info.tool_name == tool_name)
    }
}

pub const DEFAULT_GRACE_SECS: std::time::Duration = std::time::Duration::from_secs(5);

fn payload<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_noop() -> AbortHandle {
        tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        })
        .abort_handle()
    }

    #[tokio::test]
    async fn cancel_removes_and_aborts_a_registered_process() {
        let controller = ExecutionController::new(Arc::new(VoidwaveEventBus::default()));
        controller.register("p1", "nmap", Some("10.0.0.1".to_string()), spawn_noop()).await;
        assert_eq!(controller.running_count().await, 1);

        assert!(controller.cancel("p1", DEFAULT_GRACE_SECS).await);
        assert_eq!(controller.running_count().await, 0);
    }

    #[tokio::test]
    async fn cancel_unknown_process_returns_false() {
        let controller = ExecutionController::new(Arc::new(VoidwaveEventBus::default()));
        assert!(!controller.cancel("missing", DEFAULT_GRACE_SECS).await);
    }

    #[tokio::test]
    async fn stop_all_cancels_every_registered_process() {
        let controller = ExecutionController::new(Arc::new(VoidwaveEventBus::default()));
        controller.register("p1", "nmap", None, spawn_noop()).await;
        controller.register("p2", "masscan", None, spawn_noop()).await;

        let result = controller.stop_all(DEFAULT_GRACE_SECS).await;
        assert_eq!(result.cancelled, 2);
        assert_eq!(controller.running_count().await, 0);
    }

    #[tokio::test]
    async fn is_tool_running_reflects_registered_tool_name() {
        let controller = ExecutionController::new(Arc::new(VoidwaveEventBus::default()));
        controller.register("p1", "hydra", None, spawn_noop()).await;
        assert!(controller.is_tool_running("hydra").await);
        assert!(!controller.is_tool_running("john").await);
    }
}
