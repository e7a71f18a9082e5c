//! Per-category concurrency limits (spec §4.10). `password_cracker`
//! gets a limit of 1 for GPU exclusivity — only one cracking job may
//! hold the gate at a time regardless of how many chains request it.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex as AsyncMutex, OwnedSemaphorePermit, Semaphore};

pub const NETWORK_SCANNER: &str = "network_scanner";
pub const WEB_SCANNER: &str = "web_scanner";
pub const PASSWORD_CRACKER: &str = "password_cracker";
pub const TRAFFIC_CAPTURE: &str = "traffic_capture";
pub const DEFAULT_CATEGORY: &str = "default";

fn limit_for(category: &str) -> usize {
    match category {
        NETWORK_SCANNER => 10,
        WEB_SCANNER => 25,
        PASSWORD_CRACKER => 1,
        TRAFFIC_CAPTURE => 5,
        _ => 10,
    }
}

#[derive(Default)]
struct State {
    semaphores: HashMap<String, Arc<Semaphore>>,
    active: HashMap<String, usize>,
}

/// A held slot in a category; dropping it releases the slot and
/// decrements the active count.
pub struct GateGuard<'a> {
    category: String,
    gate: &'a ConcurrencyGate,
    _permit: OwnedSemaphorePermit,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.on_release(&self.category);
    }
}

/// Category-scoped admission control mirroring the runner's tool
/// execution categories. Holding a [`GateGuard`] is the only way to
/// cross the limit for that category.
pub struct ConcurrencyGate {
    state: AsyncMutex<State>,
}

impl Default for ConcurrencyGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ConcurrencyGate {
    pub fn new() -> Self {
        Self { state: AsyncMutex::new(State::default()) }
    }

    async fn semaphore_for(&self, category: &str) -> Arc<Semaphore> {
        let mut state = self.state.lock().await;
        state.semaphores.entry(category.to_string()).or_insert_with(|| Arc::new(Semaphore::new(limit_for(category)))).clone()
    }

    /// Block until a slot in `category` is available, then hold it
    /// until the returned guard is dropped.
    pub async fn acquire(&self, category: &str) -> GateGuard<'_> {
        let semaphore = self.semaphore_for(category).await;
        let permit = semaphore.acquire_owned().await.expect("semaphore is never closed");

        let mut state = self.state.lock().await;
        *state.active.entry(category.to_string()).or_insert(0) += 1;
        drop(state);

        GateGuard { category: category.to_string(), gate: self, _permit: permit }
    }

    fn on_release(&self, category: &str) {
        tracing::debug!(category, "released concurrency gate slot");
        if let Ok(mut state) = self.state.try_lock() {
            if let Some(count) = state.active.get_mut(category) {
                *count = count.saturating_sub(1);
            }
        }
    }

    pub async fn active_count(&self, category: &str) -> usize {
        self.state.lock().await.active.get(category).copied().unwrap_or(0)
    }

    pub async fn all_active(&self) -> HashMap<String, usize> {
        self.state.lock().await.active.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn password_cracker_category_is_limited_to_one() {
        let gate = ConcurrencyGate::new();
        let _first = gate.acquire(PASSWORD_CRACKER).await;
        assert_eq!(gate.active_count(PASSWORD_CRACKER).await, 1);
    }

    #[tokio::test]
    async fn releasing_a_guard_decrements_active_count() {
        let gate = ConcurrencyGate::new();
        {
            let _guard = gate.acquire(NETWORK_SCANNER).await;
            assert_eq!(gate.active_count(NETWORK_SCANNER).await, 1);
        }
        assert_eq!(gate.active_count(NETWORK_SCANNER).await, 0);
    }

    #[tokio::test]
    async fn unknown_category_gets_default_limit() {
        let gate = ConcurrencyGate::new();
        let _guard = gate.acquire("exotic_category").await;
        assert_eq!(gate.active_count("exotic_category").await, 1);
    }
}
