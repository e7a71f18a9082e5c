//! Process-wide emitter (spec §4.8): `emit` records into a bounded ring
//! buffer then dispatches to registered handlers; delivery is
//! fire-and-forget, a handler's error is logged and never blocks the
//! rest of the dispatch.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::event::{Event, EventName};

pub const DEFAULT_CAPACITY: usize = 1000;

type Handler = Box<dyn Fn(&Event) -> Result<(), String> + Send + Sync>;

/// Opaque token returned by [`VoidwaveEventBus::on`], passed back to
/// [`VoidwaveEventBus::off`] to remove that specific handler. The
/// original identifies handlers by Python function identity; a token
/// plays the same role without requiring closures to implement equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

struct Registered {
    id: HandlerId,
    handler: Handler,
}

struct State {
    history: VecDeque<Event>,
    capacity: usize,
    handlers: HashMap<EventName, Vec<Registered>>,
}

pub struct VoidwaveEventBus {
    state: Mutex<State>,
    next_id: AtomicU64,
}

impl Default for VoidwaveEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl VoidwaveEventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(State { history: VecDeque::new(), capacity, handlers: HashMap::new() }),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a handler for `name`, returning an id usable with [`off`](Self::off).
    pub fn on(&self, name: EventName, handler: impl Fn(&Event) -> Result<(), String> + Send + Sync + 'static) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut state = self.state.lock().expect("event bus mutex poisoned");
        state.handlers.entry(name).or_default().push(Registered { id, handler: Box::new(handler) });
        id
    }

    /// Remove a previously registered handler. No-op if already removed.
    pub fn off(&self, name: EventName, id: HandlerId) {
        let mut state = self.state.lock().expect("event bus mutex poisoned");
        if let Some(registered) = state.handlers.get_mut(&name) {
            registered.retain(|r| r.id != id);
        }
    }

    /// Record `name`/`payload` into history and dispatch to every
    /// registered handler. A handler that errors is logged via
    /// `tracing::warn!` and does not stop the remaining handlers.
    pub fn emit(&self, name: EventName, payload: Map<String, Value>) {
        let event = Event::new(name, payload);
        tracing::debug!(event = event.name.as_str(), "event emitted");

        let mut state = self.state.lock().expect("event bus mutex poisoned");
        state.history.push_back(event.clone());
        while state.history.len() > state.capacity {
            state.history.pop_front();
        }

        if let Some(registered) = state.handlers.get(&name) {
            for r in registered {
                if let Err(reason) = (r.handler)(&event) {
                    tracing::warn!(event = name.as_str(), %reason, "event handler failed");
                }
            }
        }
    }

    /// Last `limit` events, most recent last, optionally filtered to a
    /// single event name.
    pub fn history(&self, filter: Option<EventName>, limit: usize) -> Vec<Event> {
        let state = self.state.lock().expect("event bus mutex poisoned");
        let mut matching: Vec<Event> = match filter {
            Some(name) => state.history.iter().filter(|e| e.name == name).cloned().collect(),
            None => state.history.iter().cloned().collect(),
        };
        if matching.len() > limit {
            let drop = matching.len() - limit;
            matching.drain(..drop);
        }
        matching
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering as AOrdering};
    use std::sync::Arc;

    #[test]
    fn history_is_bounded_to_capacity() {
        let bus = VoidwaveEventBus::new(3);
        for i in 0..10 {
            bus.emit(EventName::ToolOutput, json!({"line": i}).as_object().unwrap().clone());
        }
        assert_eq!(bus.history(None, 100).len(), 3);
    }

    #[test]
    fn history_filters_by_event_name() {
        let bus = VoidwaveEventBus::default();
        bus.emit(EventName::ToolStarted, Map::new());
        bus.emit(EventName::ToolFailed, Map::new());
        bus.emit(EventName::ToolStarted, Map::new());
        assert_eq!(bus.history(Some(EventName::ToolStarted), 100).len(), 2);
    }

    #[test]
    fn registered_handler_receives_the_event() {
        let bus = VoidwaveEventBus::default();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        bus.on(EventName::TaskCompleted, move |_event| {
            seen_clone.fetch_add(1, AOrdering::Relaxed);
            Ok(())
        });
        bus.emit(EventName::TaskCompleted, Map::new());
        assert_eq!(seen.load(AOrdering::Relaxed), 1);
    }

    #[test]
    fn a_failing_handler_does_not_block_the_next_one() {
        let bus = VoidwaveEventBus::default();
        let seen = Arc::new(AtomicUsize::new(0));
        bus.on(EventName::ToolFailed, |_event| Err("boom".to_string()));
        let seen_clone = seen.clone();
        bus.on(EventName::ToolFailed, move |_event| {
            seen_clone.fetch_add(1, AOrdering::Relaxed);
            Ok(())
        });
        bus.emit(EventName::ToolFailed, Map::new());
        assert_eq!(seen.load(AOrdering::Relaxed), 1);
    }

    #[test]
    fn off_removes_a_handler_by_id() {
        let bus = VoidwaveEventBus::default();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        let id = bus.on(EventName::SessionEnded, move |_event| {
            seen_clone.fetch_add(1, AOrdering::Relaxed);
            Ok(())
        });
        bus.off(EventName::SessionEnded, id);
        bus.emit(EventName::SessionEnded, Map::new());
        assert_eq!(seen.load(AOrdering::Relaxed), 0);
    }
}
