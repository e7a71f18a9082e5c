//! Declarative tool chains: data flows from one step's parsed output
//! into the next step's target or options, steps gate on conditions,
//! and independent steps run concurrently (spec §4.2–§4.3).

mod bindings;
mod dag;
mod executor;
mod models;
mod registry;

pub use bindings::{evaluate_condition, resolve_binding};
pub use dag::build_execution_order;
pub use executor::{ChainExecutor, DEFAULT_STEP_TIMEOUT};
pub use models::{
    ChainDefinition, ChainResult, ChainStep, Condition, ConditionCheck, DataBinding, OnErrorBehavior, StepResult, StepStatus,
};
pub use registry::ChainRegistry;
