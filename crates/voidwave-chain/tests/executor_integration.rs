//! End-to-end executor behavior against spec §8's boundary cases.
//! Uses the `true`/`false` coreutils as stand-ins for real scan tools
//! (routed through `Tool::Generic`) so these run anywhere without a
//! real scanner binary on PATH.

use std::sync::Arc;

use voidwave_chain::{ChainDefinition, ChainExecutor, ChainStep, StepStatus};
use voidwave_events::VoidwaveEventBus;
use voidwave_tools::ToolRegistry;

fn chain(id: &str, steps: Vec<ChainStep>) -> ChainDefinition {
    ChainDefinition {
        id: id.to_string(),
        name: id.to_string(),
        description: String::new(),
        steps,
        target_type: "ip".to_string(),
        preflight_action: None,
        tags: vec![],
        version: "1.0".to_string(),
    }
}

fn executor() -> ChainExecutor {
    ChainExecutor::new(Arc::new(ToolRegistry::new()), Arc::new(VoidwaveEventBus::default()))
}

#[tokio::test]
async fn empty_chain_succeeds_with_no_steps() {
    let mut executor = executor();
    let result = executor.execute(&chain("empty", vec![]), Some("10.0.0.1")).await;
    assert!(result.success);
    assert!(result.steps.is_empty());
}

#[tokio::test]
async fn single_failing_step_with_stop_policy_fails_the_chain() {
    let mut step = ChainStep::new("probe", "false");
    step.retry_count = 0;
    let mut executor = executor();
    let result = executor.execute(&chain("single_stop", vec![step]), Some("10.0.0.1")).await;

    assert!(!result.success);
    assert_eq!(result.steps.len(), 1);
    assert_eq!(result.steps["probe"].status, StepStatus::Failed);
}

#[tokio::test]
async fn a_succeeding_step_completes_and_populates_final_output() {
    let mut step = ChainStep::new("probe", "true");
    step.retry_count = 0;
    step.output_key = Some("probe_result".to_string());
    let mut executor = executor();
    let result = executor.execute(&chain("single_ok", vec![step]), Some("10.0.0.1")).await;

    assert!(result.success);
    assert_eq!(result.steps["probe"].status, StepStatus::Completed);
    assert!(result.final_output.contains_key("probe_result"));
}

#[tokio::test]
async fn every_completed_or_skipped_step_satisfies_the_success_invariant() {
    let mut step_a = ChainStep::new("a", "true");
    step_a.retry_count = 0;
    let mut step_b = ChainStep::new("b", "true");
    step_b.retry_count = 0;
    step_b.depends_on = vec!["a".to_string()];

    let mut executor = executor();
    let result = executor.execute(&chain("two_step", vec![step_a, step_b]), Some("10.0.0.1")).await;

    assert!(result.success);
    for step in result.steps.values() {
        assert!(matches!(step.status, StepStatus::Completed | StepStatus::Skipped));
        if let (Some(start), Some(end)) = (step.started_at, step.ended_at) {
            assert!(start <= end);
        }
    }
}

#[tokio::test]
async fn a_step_with_a_zero_timeout_fails_without_running_the_tool() {
    let mut step = ChainStep::new("probe", "true");
    step.timeout = Some(0);
    let mut executor = executor();
    let result = executor.execute(&chain("zero_timeout", vec![step]), Some("10.0.0.1")).await;

    assert!(!result.success);
    assert_eq!(result.steps["probe"].status, StepStatus::Failed);
    assert!(result.steps["probe"].errors.iter().any(|e| e.contains("timeout of 0")));
}

#[tokio::test]
async fn parallel_with_steps_both_complete_after_their_shared_dependency() {
    let scan = ChainStep::new("scan_networks", "true");
    let mut capture = ChainStep::new("target_capture", "true");
    capture.retry_count = 0;
    capture.depends_on = vec!["scan_networks".to_string()];
    capture.parallel_with = vec!["deauth_attack".to_string()];
    let mut deauth = ChainStep::new("deauth_attack", "true");
    deauth.retry_count = 0;
    deauth.depends_on = vec!["scan_networks".to_string()];

    let mut executor = executor();
    let result = executor.execute(&chain("wpa_capture", vec![scan, capture, deauth]), Some("10.0.0.1")).await;

    assert!(result.success);
    assert_eq!(result.steps["target_capture"].status, StepStatus::Completed);
    assert_eq!(result.steps["deauth_attack"].status, StepStatus::Completed);
}
