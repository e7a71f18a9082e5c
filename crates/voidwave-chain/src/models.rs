//! Chain data model: steps, bindings, conditions, and their results
//! (spec §3, §4.2–§4.3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnErrorBehavior {
    #[default]
    Stop,
    Skip,
    Retry,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    Skipped,
    Failed,
}

/// The closed set of condition checks a step's [`Condition`] can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionCheck {
    Exists,
    CountGt,
    CountLt,
    ValueEq,
    ValueNe,
    HasKey,
    Contains,
}

/// Maps one step's parsed output into another step's target or option
/// (spec §4.2). `transform` names an entry in the
/// [`voidwave_transforms`] registry rather than carrying a closure —
/// declarative chain definitions can only reference transforms by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataBinding {
    pub source_step: String,
    pub source_path: String,
    pub target_option: String,
    #[serde(default)]
    pub transform: Option<String>,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default)]
    pub default: Option<Value>,
}

fn default_true() -> bool {
    true
}

impl DataBinding {
    pub fn new(source_step: impl Into<String>, source_path: impl Into<String>, target_option: impl Into<String>) -> Self {
        Self {
            source_step: source_step.into(),
            source_path: source_path.into(),
            target_option: target_option.into(),
            transform: None,
            required: true,
            default: None,
        }
    }

    pub fn with_transform(mut self, transform: impl Into<String>) -> Self {
        self.transform = Some(transform.into());
        self
    }

    pub fn optional(mut self, default: Value) -> Self {
        self.required = false;
        self.default = Some(default);
        self
    }
}

/// Gates whether a step runs, based on another step's parsed output
/// (spec §4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub source_step: String,
    pub check: ConditionCheck,
    pub path: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub negate: bool,
}

impl Condition {
    pub fn new(source_step: impl Into<String>, check: ConditionCheck, path: impl Into<String>) -> Self {
        Self { source_step: source_step.into(), check, path: path.into(), value: None, negate: false }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }
}

/// A single node in a chain's dependency graph (spec §4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainStep {
    pub id: String,
    pub tool: String,
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub target_binding: Option<DataBinding>,
    #[serde(default)]
    pub target_static: Option<String>,

    #[serde(default)]
    pub options: Map<String, Value>,
    #[serde(default)]
    pub option_bindings: Vec<DataBinding>,

    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub on_error: OnErrorBehavior,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: f64,
    /// Per-step timeout in seconds. `None` means "runner default";
    /// `Some(0)` is never valid (spec §8 boundary behavior).
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub fallback_tool: Option<String>,

    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub parallel_with: Vec<String>,

    #[serde(default)]
    pub output_key: Option<String>,
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_delay() -> f64 {
    1.0
}

impl ChainStep {
    pub fn new(id: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tool: tool.into(),
            description: String::new(),
            target_binding: None,
            target_static: None,
            options: Map::new(),
            option_bindings: Vec::new(),
            condition: None,
            on_error: OnErrorBehavior::Stop,
            retry_count: default_retry_count(),
            retry_delay_secs: default_retry_delay(),
            timeout: None,
            fallback_tool: None,
            depends_on: Vec::new(),
            parallel_with: Vec::new(),
            output_key: None,
        }
    }
}

/// A complete, reusable chain (spec §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub steps: Vec<ChainStep>,

    #[serde(default = "default_target_type")]
    pub target_type: String,
    #[serde(default)]
    pub preflight_action: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_target_type() -> String {
    "ip".to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Outcome of one step's execution (spec §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step_id: String,
    pub tool: String,
    pub status: StepStatus,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub duration_secs: f64,
    #[serde(default)]
    pub retries: u32,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

impl StepResult {
    pub fn new(step_id: impl Into<String>, tool: impl Into<String>, status: StepStatus) -> Self {
        Self {
            step_id: step_id.into(),
            tool: tool.into(),
            status,
            data: Value::Object(Map::new()),
            errors: Vec::new(),
            duration_secs: 0.0,
            retries: 0,
            started_at: None,
            ended_at: None,
        }
    }
}

/// Outcome of an entire chain run (spec §4.3, §8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainResult {
    pub chain_id: String,
    pub success: bool,
    #[serde(default)]
    pub steps: std::collections::HashMap<String, StepResult>,
    #[serde(default)]
    pub final_output: Map<String, Value>,
    #[serde(default)]
    pub total_duration_secs: f64,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

impl ChainResult {
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            success: true,
            steps: std::collections::HashMap::new(),
            final_output: Map::new(),
            total_duration_secs: 0.0,
            errors: Vec::new(),
            started_at: None,
            ended_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_step_defaults_on_error_to_stop() {
        let step = ChainStep::new("scan", "nmap");
        assert_eq!(step.on_error, OnErrorBehavior::Stop);
        assert_eq!(step.retry_count, 3);
        assert!(step.timeout.is_none());
    }

    #[test]
    fn data_binding_builder_sets_transform_and_optionality() {
        let binding = DataBinding::new("fast_scan", "hosts[*].ip", "target")
            .with_transform("join")
            .optional(Value::String(String::new()));
        assert_eq!(binding.transform.as_deref(), Some("join"));
        assert!(!binding.required);
    }
}
