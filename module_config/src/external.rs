//! External configuration sources and how their fragments join local ones.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::BoxError;

/// A configuration fragment tagged with the priority it merges at.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PrioritizedConfig {
    /// Merge priority; higher priorities override lower ones.
    pub priority: i64,
    /// Configuration fragment.
    pub config: Value,
}

impl PrioritizedConfig {
    /// Create a prioritised fragment.
    #[must_use]
    pub const fn new(priority: i64, config: Value) -> Self {
        Self { priority, config }
    }
}

/// Asynchronous source of module configuration outside the rule store.
///
/// Providers are never consulted for annotation configuration.
#[async_trait]
pub trait ExternalProvider: Send + Sync {
    /// Fragments for `module_id`, or `None` when the source knows nothing
    /// about it.
    ///
    /// # Errors
    ///
    /// Any error rejects the query.
    async fn select_external(
        &self,
        module_id: &str,
    ) -> Result<Option<Vec<PrioritizedConfig>>, BoxError>;
}

struct Ranked {
    priority: i64,
    ordinal: usize,
    config: Value,
}

fn sort_ranked<I>(entries: I) -> Vec<Value>
where
    I: IntoIterator<Item = PrioritizedConfig>,
{
    let mut ranked: Vec<Ranked> = entries
        .into_iter()
        .enumerate()
        .map(|(ordinal, entry)| Ranked {
            priority: entry.priority,
            ordinal,
            config: entry.config,
        })
        .collect();
    ranked.sort_by(|a, b| a.priority.cmp(&b.priority).then(a.ordinal.cmp(&b.ordinal)));
    ranked.into_iter().map(|entry| entry.config).collect()
}

/// Order local and external fragments for merging.
///
/// `internal` is `None` when the rule store has no entry for the module.
/// When both sources contribute, every local fragment is placed at
/// priority 0 after all external fragments, so an external priority-0
/// fragment is overridden by local ones.
pub(crate) fn combine(
    internal: Option<Vec<Value>>,
    external: Option<Vec<PrioritizedConfig>>,
) -> Vec<Value> {
    match (internal, external) {
        (internal, None) => internal.unwrap_or_default(),
        (None, Some(external)) => sort_ranked(external),
        (Some(internal), Some(external)) => sort_ranked(
            external
                .into_iter()
                .chain(internal.into_iter().map(|config| PrioritizedConfig::new(0, config))),
        ),
    }
}
