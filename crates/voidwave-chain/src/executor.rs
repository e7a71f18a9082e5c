//! Executes a chain: walks its dependency groups, resolves each step's
//! target/options through data bindings, runs the tool, retries with
//! backoff, and falls back to a secondary tool on exhaustion (spec
//! §4.3, §7, §8).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::{Map, Value};

use voidwave_events::{EventName, VoidwaveEventBus};
use voidwave_tools::ToolRegistry;

use crate::bindings::{evaluate_condition, resolve_binding};
use crate::dag::build_execution_order;
use crate::models::{ChainDefinition, ChainResult, ChainStep, OnErrorBehavior, StepResult, StepStatus};

/// Used when a step sets no `timeout` (spec §8: absence means "runner
/// default"; `Some(0)` is a configuration error, never silently
/// substituted).
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(300);

pub struct ChainExecutor {
    tools: Arc<ToolRegistry>,
    events: Arc<VoidwaveEventBus>,
    results: HashMap<String, StepResult>,
    cancelled: Arc<std::sync::atomic::AtomicBool>,
}

impl ChainExecutor {
    pub fn new(tools: Arc<ToolRegistry>, events: Arc<VoidwaveEventBus>) -> Self {
        Self { tools, events, results: HashMap::new(), cancelled: Arc::new(std::sync::atomic::AtomicBool::new(false)) }
    }

    /// Signal the currently running (or next) `execute` call to stop
    /// scheduling further groups.
    pub fn cancel(&self) {
        self.cancelled.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn get_step_result(&self, step_id: &str) -> Option<&StepResult> {
        self.results.get(step_id)
    }

    pub fn all_results(&self) -> &HashMap<String, StepResult> {
        &self.results
    }

    pub async fn execute(&mut self, chain: &ChainDefinition, target: Option<&str>) -> ChainResult {
        let mut result = ChainResult::new(chain.id.clone());
        result.started_at = Some(Utc::now());

        self.events.emit(
            EventName::TaskStarted,
            payload([("task_type", Value::from("chain")), ("chain_id", Value::from(chain.id.clone())), ("chain_name", Value::from(chain.name.clone()))]),
        );

        let groups = build_execution_order(&chain.steps);

        for group in groups {
            if self.cancelled.load(std::sync::atomic::Ordering::SeqCst) {
                result.success = false;
                result.errors.push("Chain cancelled".to_string());
                break;
            }

            let group_results = self.execute_group(group, chain, target).await;

            let mut stop = false;
            for (step_id, step_result) in group_results {
                let on_error = chain.steps.iter().find(|s| s.id == step_id).map(|s| s.on_error).unwrap_or_default();
                let failed = step_result.status == StepStatus::Failed;
                self.results.insert(step_id.clone(), step_result.clone());
                result.steps.insert(step_id, step_result.clone());

                if failed && on_error == OnErrorBehavior::Stop {
                    result.success = false;
                    result.errors.extend(step_result.errors.clone());
                    stop = true;
                }
            }

            if stop {
                result.ended_at = Some(Utc::now());
                result.total_duration_secs = duration_secs(result.started_at, result.ended_at);
                self.events.emit(
                    EventName::TaskCompleted,
                    payload([("task_type", Value::from("chain")), ("chain_id", Value::from(chain.id.clone())), ("success", Value::from(false))]),
                );
                return result;
            }
        }

        result.final_output = self.aggregate_outputs(chain);
        result.ended_at = Some(Utc::now());
        result.total_duration_secs = duration_secs(result.started_at, result.ended_at);

        self.events.emit(
            EventName::TaskCompleted,
            payload([
                ("task_type", Value::from("chain")),
                ("chain_id", Value::from(chain.id.clone())),
                ("success", Value::from(result.success)),
                ("duration", Value::from(result.total_duration_secs)),
            ]),
        );

        result
    }

    async fn execute_group(&self, group: Vec<ChainStep>, chain: &ChainDefinition, target: Option<&str>) -> Vec<(String, StepResult)> {
        if group.len() == 1 {
            let step = group.into_iter().next().expect("checked len == 1");
            let step_id = step.id.clone();
            let result = self.execute_step(&step, chain, target).await;
            return vec![(step_id, result)];
        }

        let mut join_set = tokio::task::JoinSet::new();
        let snapshot = Arc::new(self.results.clone());
        for step in group {
            let tools = self.tools.clone();
            let events = self.events.clone();
            let snapshot = snapshot.clone();
            let chain_target = target.map(str::to_string);
            let chain_id = chain.id.clone();
            join_set.spawn(async move {
                let step_id = step.id.clone();
                let result = execute_step_with(&tools, &events, &snapshot, &step, &chain_id, chain_target.as_deref()).await;
                (step_id, result)
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(pair) => results.push(pair),
                Err(e) => results.push(("unknown".to_string(), StepResult { errors: vec![e.to_string()], ..StepResult::new("unknown", "unknown", StepStatus::Failed) })),
            }
        }
        results
    }

    async fn execute_step(&self, step: &ChainStep, chain: &ChainDefinition, target: Option<&str>) -> StepResult {
        execute_step_with(&self.tools, &self.events, &self.results, step, &chain.id, target).await
    }

    fn aggregate_outputs(&self, chain: &ChainDefinition) -> Map<String, Value> {
        let mut output = Map::new();
        for step in &chain.steps {
            if let Some(result) = self.results.get(&step.id) {
                if result.status == StepStatus::Completed {
                    let key = step.output_key.clone().unwrap_or_else(|| step.id.clone());
                    output.insert(key, result.data.clone());
                }
            }
        }
        output
    }
}

async fn execute_step_with(
    tools: &ToolRegistry,
    events: &VoidwaveEventBus,
    results: &HashMap<String, StepResult>,
    step: &ChainStep,
    chain_id: &str,
    chain_target: Option<&str>,
) -> StepResult {
    let mut result = StepResult::new(step.id.clone(), step.tool.clone(), StepStatus::Running);
    result.started_at = Some(Utc::now());

    if let Some(condition) = &step.condition {
        if !evaluate_condition(condition, results) {
            result.status = StepStatus::Skipped;
            result.ended_at = Some(Utc::now());
            return result;
        }
    }

    let Some(target) = resolve_target(step, chain_target, results) else {
        result.status = StepStatus::Failed;
        result.errors.push("Could not resolve target".to_string());
        result.ended_at = Some(Utc::now());
        return result;
    };

    let options = match resolve_options(step, results) {
        Ok(options) => options,
        Err(reason) => {
            result.status = StepStatus::Failed;
            result.errors.push(reason);
            result.ended_at = Some(Utc::now());
            return result;
        }
    };

    let timeout = match step.timeout {
        Some(0) => {
            result.status = StepStatus::Failed;
            result.errors.push("tool timeout of 0 is not permitted".to_string());
            result.ended_at = Some(Utc::now());
            return result;
        }
        Some(seconds) => Duration::from_secs(seconds),
        None => DEFAULT_STEP_TIMEOUT,
    };

    events.emit(EventName::ToolStarted, payload([("tool", Value::from(step.tool.clone())), ("target", Value::from(target.clone())), ("step_id", Value::from(step.id.clone())), ("chain_id", Value::from(chain_id.to_string()))]));

    for attempt in 0..=step.retry_count {
        match tools.execute(&step.tool, &target, &options, timeout).await {
            Ok(outcome) if outcome.success => {
                result.status = StepStatus::Completed;
                result.data = outcome.data;
                result.ended_at = Some(Utc::now());
                result.duration_secs = duration_secs(result.started_at, result.ended_at);
                result.retries = attempt;
                events.emit(EventName::ToolCompleted, payload([("tool", Value::from(step.tool.clone())), ("step_id", Value::from(step.id.clone()))]));
                return result;
            }
            Ok(outcome) => result.errors.extend(outcome.errors),
            Err(e) => result.errors.push(e.to_string()),
        }

        result.retries = attempt;
        if attempt < step.retry_count {
            let delay = Duration::from_secs_f64(step.retry_delay_secs * 2f64.powi(attempt as i32));
            tokio::time::sleep(delay).await;
        }
    }

    if let (Some(fallback_tool), OnErrorBehavior::Fallback) = (&step.fallback_tool, step.on_error) {
        let fallback_result = try_fallback(tools, events, step, fallback_tool, &target, &options, timeout).await;
        if fallback_result.status == StepStatus::Completed {
            return fallback_result;
        }
        result.errors.extend(fallback_result.errors);
    }

    result.status = StepStatus::Failed;
    result.ended_at = Some(Utc::now());
    result.duration_secs = duration_secs(result.started_at, result.ended_at);
    events.emit(EventName::ToolFailed, payload([("tool", Value::from(step.tool.clone())), ("step_id", Value::from(step.id.clone()))]));
    result
}

async fn try_fallback(
    tools: &ToolRegistry,
    events: &VoidwaveEventBus,
    step: &ChainStep,
    fallback_tool: &str,
    target: &str,
    options: &Map<String, Value>,
    timeout: Duration,
) -> StepResult {
    let mut result = StepResult::new(step.id.clone(), fallback_tool.to_string(), StepStatus::Running);
    result.started_at = Some(Utc::now());

    tracing::info!(tool = fallback_tool, step_id = %step.id, "trying fallback tool");

    match tools.execute(fallback_tool, target, options, timeout).await {
        Ok(outcome) if outcome.success => {
            result.status = StepStatus::Completed;
            result.data = outcome.data;
        }
        Ok(outcome) => {
            result.status = StepStatus::Failed;
            result.errors = outcome.errors;
        }
        Err(e) => {
            result.status = StepStatus::Failed;
            result.errors.push(format!("Fallback failed: {e}"));
        }
    }

    result.ended_at = Some(Utc::now());
    result.duration_secs = duration_secs(result.started_at, result.ended_at);
    if result.status == StepStatus::Completed {
        events.emit(EventName::ToolCompleted, payload([("tool", Value::from(fallback_tool.to_string())), ("step_id", Value::from(step.id.clone()))]));
    }
    result
}

/// Target resolution order (spec §9): step binding > step static >
/// chain-level > caller context. There is deliberately no implicit
/// session fallback — callers must pass a target explicitly.
fn resolve_target(step: &ChainStep, chain_target: Option<&str>, results: &HashMap<String, StepResult>) -> Option<String> {
    if let Some(binding) = &step.target_binding {
        if let Some(value) = resolve_binding(binding, results) {
            return Some(value_to_target_string(&value));
        }
    }
    if let Some(static_target) = &step.target_static {
        return Some(static_target.clone());
    }
    chain_target.map(str::to_string)
}

fn value_to_target_string(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string())).collect::<Vec<_>>().join(","),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn resolve_options(step: &ChainStep, results: &HashMap<String, StepResult>) -> Result<Map<String, Value>, String> {
    let mut options = step.options.clone();

    for binding in &step.option_bindings {
        match resolve_binding(binding, results) {
            Some(value) => {
                options.insert(binding.target_option.clone(), value);
            }
            None if binding.required => {
                return Err(format!("Required binding not found: {}.{}", binding.source_step, binding.source_path));
            }
            None => {
                if let Some(default) = &binding.default {
                    options.insert(binding.target_option.clone(), default.clone());
                }
            }
        }
    }

    Ok(options)
}

fn duration_secs(started: Option<chrono::DateTime<Utc>>, ended: Option<chrono::DateTime<Utc>>) -> f64 {
    match (started, ended) {
        (Some(start), Some(end)) => (end - start).num_milliseconds() as f64 / 1000.0,
        _ => 0.0,
    }
}

fn payload<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChainStep;

    #[test]
    fn target_binding_takes_priority_over_static_and_chain_target() {
        let mut step = ChainStep::new("scan", "nmap");
        step.target_static = Some("10.0.0.9".to_string());
        let mut results = HashMap::new();
        results.insert(
            "fast_scan".to_string(),
            StepResult { data: serde_json::json!({"ip": "10.0.0.1"}), ..StepResult::new("fast_scan", "masscan", StepStatus::Completed) },
        );
        step.target_binding = Some(crate::models::DataBinding::new("fast_scan", "ip", "target"));

        let resolved = resolve_target(&step, Some("10.0.0.99"), &results);
        assert_eq!(resolved, Some("10.0.0.1".to_string()));
    }

    #[test]
    fn falls_back_to_chain_target_with_no_binding_or_static() {
        let step = ChainStep::new("scan", "nmap");
        let resolved = resolve_target(&step, Some("10.0.0.5"), &HashMap::new());
        assert_eq!(resolved, Some("10.0.0.5".to_string()));
    }

    #[test]
    fn required_missing_binding_fails_option_resolution() {
        let mut step = ChainStep::new("scan", "nmap");
        step.option_bindings.push(crate::models::DataBinding::new("missing", "ports", "ports"));
        let err = resolve_options(&step, &HashMap::new()).unwrap_err();
        assert!(err.contains("Required binding not found"));
    }
}
