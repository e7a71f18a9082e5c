//! Execution control: cancel/stop-all for running tools, plus a
//! per-category concurrency gate (spec §4.9–§4.10).

mod controller;
mod gate;

pub use controller::{ExecutionController, RunningProcess, StopAllResult, DEFAULT_GRACE_SECS};
pub use gate::{ConcurrencyGate, GateGuard, DEFAULT_CATEGORY, NETWORK_SCANNER, PASSWORD_CRACKER, TRAFFIC_CAPTURE, WEB_SCANNER};
