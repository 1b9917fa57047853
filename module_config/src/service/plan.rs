//! Turning a rule list into fragments.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;
use serde_json::Value;
use tracing::trace;

use crate::loader::DependencyLoader;
use crate::rule::{ConfigFactory, ConfigSource, RegisteredRule};
use crate::{ConfigError, ConfigResult};

enum Step {
    Constant(Value),
    Factory {
        factory: ConfigFactory,
        slots: Vec<usize>,
    },
}

/// Fragment producers for one query, sharing a deduplicated dependency list.
pub(super) struct ResolutionPlan {
    dependencies: Vec<String>,
    steps: Vec<Step>,
}

impl ResolutionPlan {
    /// Plan the rules in specificity order.
    pub(super) fn new(rules: &[Arc<RegisteredRule>]) -> Self {
        let mut dependencies = Vec::new();
        let mut slot_of: HashMap<String, usize> = HashMap::new();
        let steps = rules
            .iter()
            .map(|rule| match rule.source() {
                ConfigSource::Constant(value) => Step::Constant(value.clone()),
                ConfigSource::Factory(factory) => {
                    let slots = factory
                        .dependencies()
                        .iter()
                        .map(|id| {
                            *slot_of.entry(id.clone()).or_insert_with(|| {
                                dependencies.push(id.clone());
                                dependencies.len() - 1
                            })
                        })
                        .collect();
                    Step::Factory {
                        factory: factory.clone(),
                        slots,
                    }
                }
            })
            .collect();
        Self {
            dependencies,
            steps,
        }
    }

    /// Deduplicated dependency ids, in first-request order.
    pub(super) fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Load every dependency concurrently, then produce fragments in rule
    /// order.
    pub(super) async fn run(
        self,
        module_id: &str,
        loader: &dyn DependencyLoader,
    ) -> ConfigResult<Vec<Value>> {
        trace!(
            module = module_id,
            rules = self.steps.len(),
            dependencies = self.dependencies().len(),
            "resolving rule fragments"
        );
        let values = try_join_all(self.dependencies.iter().map(|id| async move {
            loader
                .load(id)
                .await
                .map_err(|source| ConfigError::dependency_load(id.as_str(), source))
        }))
        .await?;

        self.steps
            .into_iter()
            .map(|step| match step {
                Step::Constant(value) => Ok(value),
                Step::Factory { factory, slots } => {
                    let arguments: Vec<Value> = slots
                        .iter()
                        .filter_map(|&slot| values.get(slot).cloned())
                        .collect();
                    factory
                        .produce(&arguments)
                        .map_err(|source| ConfigError::factory(module_id, source))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Selector;
    use serde_json::json;

    fn registered(ordinal: u64, source: ConfigSource) -> Arc<RegisteredRule> {
        Arc::new(RegisteredRule {
            ordinal,
            priority: 0,
            select: Selector::module("m"),
            source,
        })
    }

    #[test]
    fn shared_dependencies_are_planned_once_in_request_order() {
        let rules = vec![
            registered(0, ConfigFactory::new(["b", "a"], |_| Ok(json!({}))).into()),
            registered(1, ConfigSource::Constant(json!({"c": 1}))),
            registered(2, ConfigFactory::new(["a", "c", "b"], |_| Ok(json!({}))).into()),
        ];
        let plan = ResolutionPlan::new(&rules);
        assert_eq!(plan.dependencies(), ["b", "a", "c"]);
    }
}
