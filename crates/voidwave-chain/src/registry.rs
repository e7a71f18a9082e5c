//! In-memory registry of reusable chain definitions, plus `compose`/
//! `extend` combinators for building new chains out of registered ones
//! (spec §4.3 composition, §8's `register(c); unregister(c.id)`
//! round-trip law).

use std::collections::{HashMap, HashSet};

use voidwave_core::CoreError;

use crate::models::ChainDefinition;

#[derive(Debug, Default)]
pub struct ChainRegistry {
    chains: HashMap<String, ChainDefinition>,
    tags: HashMap<String, HashSet<String>>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, chain: ChainDefinition) {
        for tag in &chain.tags {
            self.tags.entry(tag.clone()).or_default().insert(chain.id.clone());
        }
        self.chains.insert(chain.id.clone(), chain);
    }

    pub fn unregister(&mut self, chain_id: &str) -> bool {
        let Some(chain) = self.chains.remove(chain_id) else {
            return false;
        };
        for tag in &chain.tags {
            if let Some(ids) = self.tags.get_mut(tag) {
                ids.remove(chain_id);
            }
        }
        true
    }

    pub fn get(&self, chain_id: &str) -> Option<&ChainDefinition> {
        self.chains.get(chain_id)
    }

    pub fn get_by_tag(&self, tag: &str) -> Vec<&ChainDefinition> {
        self.tags.get(tag).into_iter().flatten().filter_map(|id| self.chains.get(id)).collect()
    }

    pub fn list_all(&self) -> Vec<&ChainDefinition> {
        self.chains.values().collect()
    }

    pub fn list_ids(&self) -> Vec<&str> {
        self.chains.keys().map(String::as_str).collect()
    }

    pub fn list_tags(&self) -> Vec<&str> {
        self.tags.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, chain_id: &str) -> bool {
        self.chains.contains_key(chain_id)
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainDefinition> {
        self.chains.values()
    }

    /// Compose several registered chains into one: steps are
    /// id-prefixed per source chain and, unless a step already
    /// declares its own dependencies, depend on every step of the
    /// previous chain in the list.
    pub fn compose(&self, chain_ids: &[&str], new_id: Option<&str>) -> Result<ChainDefinition, CoreError> {
        if chain_ids.is_empty() {
            return Err(CoreError::Configuration {
                chain_id: new_id.unwrap_or("composed").to_string(),
                reason: "at least one chain id is required".to_string(),
            });
        }

        let mut steps = Vec::new();
        let mut prev_step_ids: Vec<String> = Vec::new();
        let mut all_tags: HashSet<String> = HashSet::new();

        for &chain_id in chain_ids {
            let chain = self.get(chain_id).ok_or_else(|| CoreError::Configuration {
                chain_id: chain_id.to_string(),
                reason: "chain not found".to_string(),
            })?;
            all_tags.extend(chain.tags.iter().cloned());

            for step in &chain.steps {
                let mut new_step = step.clone();
                new_step.id = format!("{chain_id}.{}", step.id);
                new_step.depends_on = step.depends_on.iter().map(|dep| format!("{chain_id}.{dep}")).collect();

                if new_step.depends_on.is_empty() && !prev_step_ids.is_empty() {
                    new_step.depends_on = prev_step_ids.clone();
                }

                if let Some(binding) = &mut new_step.target_binding {
                    binding.source_step = format!("{chain_id}.{}", binding.source_step);
                }
                for binding in &mut new_step.option_bindings {
                    binding.source_step = format!("{chain_id}.{}", binding.source_step);
                }
                if let Some(condition) = &mut new_step.condition {
                    condition.source_step = format!("{chain_id}.{}", condition.source_step);
                }

                steps.push(new_step);
            }

            prev_step_ids = chain.steps.iter().map(|s| format!("{chain_id}.{}", s.id)).collect();
        }

        let composed_id = new_id.map(str::to_string).unwrap_or_else(|| format!("composed_{}", chain_ids.join("_")));
        let mut tags: Vec<String> = all_tags.into_iter().collect();
        tags.push("composed".to_string());

        Ok(ChainDefinition {
            id: composed_id,
            name: format!("Composed: {}", chain_ids.join(", ")),
            description: format!("Composed chain from: {}", chain_ids.join(", ")),
            steps,
            target_type: "ip".to_string(),
            preflight_action: None,
            tags,
            version: "1.0".to_string(),
        })
    }

    /// Append `additional_steps` to a registered chain; steps without
    /// their own dependencies depend on every step of the base chain.
    pub fn extend(&self, base_chain_id: &str, additional_steps: Vec<crate::models::ChainStep>, new_id: Option<&str>) -> Result<ChainDefinition, CoreError> {
        let base = self.get(base_chain_id).ok_or_else(|| CoreError::Configuration {
            chain_id: base_chain_id.to_string(),
            reason: "chain not found".to_string(),
        })?;

        let last_step_ids: Vec<String> = base.steps.iter().map(|s| s.id.clone()).collect();
        let mut steps = base.steps.clone();

        for mut step in additional_steps {
            if step.depends_on.is_empty() {
                step.depends_on = last_step_ids.clone();
            }
            steps.push(step);
        }

        let extended_id = new_id.map(str::to_string).unwrap_or_else(|| format!("{base_chain_id}_extended"));
        let mut tags = base.tags.clone();
        tags.push("extended".to_string());

        Ok(ChainDefinition {
            id: extended_id,
            name: format!("{} (Extended)", base.name),
            description: format!("Extended version of {}", base.name),
            steps,
            target_type: base.target_type.clone(),
            preflight_action: base.preflight_action.clone(),
            tags,
            version: base.version.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChainStep;

    fn sample(id: &str) -> ChainDefinition {
        ChainDefinition {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            steps: vec![ChainStep::new("scan", "nmap")],
            target_type: "ip".to_string(),
            preflight_action: None,
            tags: vec!["recon".to_string()],
            version: "1.0".to_string(),
        }
    }

    #[test]
    fn register_then_unregister_restores_prior_state() {
        let mut registry = ChainRegistry::new();
        assert!(registry.is_empty());
        registry.register(sample("scan_quick"));
        assert_eq!(registry.len(), 1);
        assert!(registry.unregister("scan_quick"));
        assert!(registry.is_empty());
        assert!(registry.get_by_tag("recon").is_empty());
    }

    #[test]
    fn compose_prefixes_step_ids_and_chains_dependencies() {
        let mut registry = ChainRegistry::new();
        registry.register(sample("a"));
        registry.register(sample("b"));
        let composed = registry.compose(&["a", "b"], None).unwrap();
        assert_eq!(composed.steps[0].id, "a.scan");
        assert_eq!(composed.steps[1].id, "b.scan");
        assert_eq!(composed.steps[1].depends_on, vec!["a.scan".to_string()]);
    }

    #[test]
    fn compose_unknown_chain_is_a_configuration_error() {
        let registry = ChainRegistry::new();
        let err = registry.compose(&["missing"], None).unwrap_err();
        assert!(matches!(err, CoreError::Configuration { .. }));
    }
}
