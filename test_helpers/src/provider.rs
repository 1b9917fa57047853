//! An external provider with canned answers per module.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use module_config::{BoxError, ExternalProvider, PrioritizedConfig};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct State {
    answers: HashMap<String, Vec<PrioritizedConfig>>,
    failures: HashMap<String, String>,
    requests: Vec<String>,
}

/// External provider answering from a table and recording every request.
///
/// Modules without an answer resolve to `None`. Clones share state.
///
/// # Examples
///
/// ```
/// use module_config::PrioritizedConfig;
/// use serde_json::json;
/// use test_helpers::ScriptedProvider;
///
/// let provider = ScriptedProvider::new()
///     .answer("m", vec![PrioritizedConfig::new(5, json!({"x": 1}))]);
/// assert!(provider.requests().is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedProvider {
    state: Arc<Mutex<State>>,
}

impl ScriptedProvider {
    /// Create a provider that knows no modules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries for `module_id` with `fragments`.
    #[must_use]
    pub fn answer(self, module_id: impl Into<String>, fragments: Vec<PrioritizedConfig>) -> Self {
        self.state.lock().answers.insert(module_id.into(), fragments);
        self
    }

    /// Fail queries for `module_id` with `message`.
    #[must_use]
    pub fn fail(self, module_id: impl Into<String>, message: impl Into<String>) -> Self {
        self.state
            .lock()
            .failures
            .insert(module_id.into(), message.into());
        self
    }

    /// Every module requested so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().requests.clone()
    }
}

#[async_trait]
impl ExternalProvider for ScriptedProvider {
    async fn select_external(
        &self,
        module_id: &str,
    ) -> Result<Option<Vec<PrioritizedConfig>>, BoxError> {
        let mut state = self.state.lock();
        state.requests.push(module_id.to_owned());
        if let Some(message) = state.failures.get(module_id) {
            return Err(message.clone().into());
        }
        Ok(state.answers.get(module_id).cloned())
    }
}
