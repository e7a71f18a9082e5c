//! Builds execution groups from a chain's step dependency graph: a
//! Kahn's-algorithm topological reduction, extended so a step's
//! `parallel_with` peers join its group as soon as they're also ready
//! (spec §8, "for every step *s*, every dependency of *s* appears in a
//! strictly earlier group than *s*").

use std::collections::{HashMap, HashSet};

use crate::models::ChainStep;

/// Groups of steps in execution order; steps within a group may run
/// concurrently, every group runs after the one before it completes.
pub fn build_execution_order(steps: &[ChainStep]) -> Vec<Vec<ChainStep>> {
    let step_map: HashMap<&str, &ChainStep> = steps.iter().map(|s| (s.id.as_str(), s)).collect();

    let mut dependencies: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut dependents: HashMap<&str, HashSet<&str>> = HashMap::new();
    for step in steps {
        let deps: HashSet<&str> = step.depends_on.iter().map(String::as_str).filter(|d| step_map.contains_key(d)).collect();
        for &dep in &deps {
            dependents.entry(dep).or_default().insert(step.id.as_str());
        }
        dependencies.insert(step.id.as_str(), deps);
    }

    let mut completed: HashSet<&str> = HashSet::new();
    let mut ready: Vec<&ChainStep> = steps.iter().filter(|s| dependencies.get(s.id.as_str()).is_none_or(HashSet::is_empty)).collect();
    let mut order: Vec<Vec<ChainStep>> = Vec::new();

    while !ready.is_empty() {
        let mut group: Vec<&ChainStep> = Vec::new();
        let mut group_ids: HashSet<&str> = HashSet::new();
        let mut next_ready: Vec<&ChainStep> = Vec::new();

        for &step in &ready {
            let deps_met = dependencies.get(step.id.as_str()).is_none_or(|deps| deps.iter().all(|d| completed.contains(d)));
            if !deps_met {
                next_ready.push(step);
                continue;
            }

            if group_ids.contains(step.id.as_str()) {
                continue;
            }
            group.push(step);
            group_ids.insert(step.id.as_str());

            for peer_id in &step.parallel_with {
                if let Some(&peer) = step_map.get(peer_id.as_str()) {
                    if !completed.contains(peer_id.as_str()) && !group_ids.contains(peer_id.as_str()) {
                        group.push(peer);
                        group_ids.insert(peer.id.as_str());
                    }
                }
            }
        }

        if group.is_empty() {
            break;
        }

        for &step in &group {
            completed.insert(step.id.as_str());
            if let Some(deps) = dependents.get(step.id.as_str()) {
                for &dep_id in deps {
                    if !completed.contains(dep_id) && !next_ready.iter().any(|s| s.id == dep_id) {
                        if let Some(&dep_step) = step_map.get(dep_id) {
                            next_ready.push(dep_step);
                        }
                    }
                }
            }
        }

        order.push(group.into_iter().cloned().collect());
        ready = next_ready;
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChainStep;

    fn step(id: &str, depends_on: &[&str]) -> ChainStep {
        let mut s = ChainStep::new(id, "nmap");
        s.depends_on = depends_on.iter().map(|s| s.to_string()).collect();
        s
    }

    #[test]
    fn independent_steps_share_a_group() {
        let steps = vec![step("a", &[]), step("b", &[])];
        let order = build_execution_order(&steps);
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].len(), 2);
    }

    #[test]
    fn dependency_places_steps_in_strictly_earlier_groups() {
        let steps = vec![step("fast_scan", &[]), step("detailed_scan", &["fast_scan"])];
        let order = build_execution_order(&steps);
        assert_eq!(order.len(), 2);
        assert_eq!(order[0][0].id, "fast_scan");
        assert_eq!(order[1][0].id, "detailed_scan");
    }

    #[test]
    fn parallel_with_peers_join_the_same_group() {
        let mut target_capture = step("target_capture", &["scan_networks"]);
        target_capture.parallel_with = vec!["deauth_attack".to_string()];
        let deauth_attack = step("deauth_attack", &["scan_networks"]);
        let scan_networks = step("scan_networks", &[]);

        let order = build_execution_order(&[scan_networks, target_capture, deauth_attack]);
        assert_eq!(order.len(), 2);
        assert_eq!(order[0][0].id, "scan_networks");
        let second_group_ids: HashSet<&str> = order[1].iter().map(|s| s.id.as_str()).collect();
        assert!(second_group_ids.contains("target_capture"));
        assert!(second_group_ids.contains("deauth_attack"));
    }

    #[test]
    fn empty_step_list_yields_no_groups() {
        assert!(build_execution_order(&[]).is_empty());
    }
}
