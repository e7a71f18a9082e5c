//! Resolves [`DataBinding`]s and evaluates [`Condition`]s against
//! already-completed step results (spec §4.2, §8).

use std::collections::HashMap;

use serde_json::Value;

use crate::models::{Condition, ConditionCheck, DataBinding, StepResult};

/// Resolve a single binding's value from `results`, applying its named
/// transform if any. Returns `binding.default` (possibly `None`) when
/// the source step hasn't run or its path resolves to nothing.
pub fn resolve_binding(binding: &DataBinding, results: &HashMap<String, StepResult>) -> Option<Value> {
    let Some(source) = results.get(&binding.source_step) else {
        return binding.default.clone();
    };

    let Some(value) = voidwave_path::resolve_path(&source.data, &binding.source_path) else {
        return binding.default.clone();
    };
    if value.is_null() {
        return binding.default.clone();
    }

    let value = match &binding.transform {
        Some(name) => voidwave_transforms::apply_transform(name, &value),
        None => value,
    };

    Some(value)
}

/// Evaluate a step's condition (spec §8's `count_gt` boundary: a
/// missing path is `false`, not an error — the step is skipped, not
/// failed).
pub fn evaluate_condition(condition: &Condition, results: &HashMap<String, StepResult>) -> bool {
    let base = match results.get(&condition.source_step) {
        None => false,
        Some(source) => {
            let value = voidwave_path::resolve_path(&source.data, &condition.path);
            check(condition.check, value.as_ref(), condition.value.as_ref())
        }
    };

    if condition.negate {
        !base
    } else {
        base
    }
}

fn check(kind: ConditionCheck, value: Option<&Value>, comparison: Option<&Value>) -> bool {
    match kind {
        ConditionCheck::Exists => value.is_some_and(|v| !v.is_null()),
        ConditionCheck::CountGt => {
            let len = value.and_then(Value::as_array).map(Vec::len);
            let threshold = comparison.and_then(Value::as_u64).unwrap_or(0) as usize;
            len.is_some_and(|len| len > threshold)
        }
        ConditionCheck::CountLt => {
            let len = value.and_then(Value::as_array).map(Vec::len);
            let threshold = comparison.and_then(Value::as_u64).unwrap_or(0) as usize;
            len.is_some_and(|len| len < threshold)
        }
        ConditionCheck::ValueEq => value == comparison,
        ConditionCheck::ValueNe => value != comparison,
        ConditionCheck::HasKey => match (value, comparison.and_then(Value::as_str)) {
            (Some(Value::Object(map)), Some(key)) => map.contains_key(key),
            _ => false,
        },
        ConditionCheck::Contains => match value {
            Some(Value::Array(items)) => comparison.is_some_and(|c| items.contains(c)),
            Some(Value::String(s)) => comparison.and_then(Value::as_str).is_some_and(|c| s.contains(c)),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StepStatus;
    use serde_json::json;

    fn results_with(step_id: &str, data: Value) -> HashMap<String, StepResult> {
        let mut result = StepResult::new(step_id, "nmap", StepStatus::Completed);
        result.data = data;
        HashMap::from([(step_id.to_string(), result)])
    }

    #[test]
    fn count_gt_against_a_missing_path_is_false_not_an_error() {
        let results = results_with("scan", json!({"other": []}));
        let condition = Condition::new("scan", ConditionCheck::CountGt, "hosts").with_value(json!(0));
        assert!(!evaluate_condition(&condition, &results));
    }

    #[test]
    fn count_gt_true_when_list_exceeds_threshold() {
        let results = results_with("scan", json!({"hosts": [1, 2, 3]}));
        let condition = Condition::new("scan", ConditionCheck::CountGt, "hosts").with_value(json!(0));
        assert!(evaluate_condition(&condition, &results));
    }

    #[test]
    fn binding_falls_back_to_default_when_source_step_missing() {
        let results = HashMap::new();
        let binding = DataBinding::new("missing_step", "hosts", "target").optional(json!("0.0.0.0"));
        assert_eq!(resolve_binding(&binding, &results), Some(json!("0.0.0.0")));
    }

    #[test]
    fn binding_applies_named_transform() {
        let results = results_with("fast_scan", json!({"hosts": [{"ip": "10.0.0.1"}, {"ip": "10.0.0.2"}]}));
        let binding = DataBinding::new("fast_scan", "hosts[*].ip", "target").with_transform("join");
        assert_eq!(resolve_binding(&binding, &results), Some(json!("10.0.0.1,10.0.0.2")));
    }
}
