//! Thin entry point: wires the core subsystems together and runs one
//! chain definition loaded from a JSON file. CLI parsing, config
//! loading, and the TUI are out of scope for the core (spec §1) — this
//! binary exists to exercise the wiring, not to be the product's shell.

use std::sync::Arc;

use anyhow::{Context, Result};
use voidwave_chain::{ChainDefinition, ChainExecutor};
use voidwave_control::{ConcurrencyGate, ExecutionController};
use voidwave_events::VoidwaveEventBus;
use voidwave_orchestrator::{NullPersistenceSink, NullUiBridge, Orchestrator};
use voidwave_tools::ToolRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).try_init().ok();

    let mut args = std::env::args().skip(1);
    let chain_path = args.next().context("usage: voidwave <chain.json> [target]")?;
    let target = args.next();

    let raw = std::fs::read_to_string(&chain_path).with_context(|| format!("reading {chain_path}"))?;
    let chain: ChainDefinition = serde_json::from_str(&raw).with_context(|| format!("parsing {chain_path} as a chain definition"))?;

    let events = Arc::new(VoidwaveEventBus::default());
    let tools = Arc::new(ToolRegistry::new());
    let controller = Arc::new(ExecutionController::new(events.clone()));
    controller.listen_for_stop_all();
    let _gate = ConcurrencyGate::new();

    let orchestrator = Orchestrator::new(events.clone(), Arc::new(NullPersistenceSink), Arc::new(NullUiBridge));
    orchestrator.register_default_handlers();

    let mut executor = ChainExecutor::new(tools, events);
    let result = executor.execute(&chain, target.as_deref()).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}
