//! A dependency loader backed by a fixed table of values.
//!
//! # Examples
//!
//! ```
//! use test_helpers::RecordingLoader;
//!
//! let loader = RecordingLoader::new().with_value("d1", 5);
//! let handle = loader.clone();
//! // pass `loader` to the service, inspect `handle` afterwards
//! assert_eq!(handle.load_count("d1"), 0);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use module_config::{BoxError, DependencyLoader};
use parking_lot::Mutex;
use serde_json::Value;

#[derive(Debug, Default)]
struct State {
    values: HashMap<String, Value>,
    failures: HashMap<String, String>,
    calls: Vec<String>,
}

/// Dependency loader answering from a table and recording every call.
///
/// Clones share state, so a test can keep one handle while the service owns
/// another. Ids absent from the table fail to load.
#[derive(Clone, Debug, Default)]
pub struct RecordingLoader {
    state: Arc<Mutex<State>>,
}

impl RecordingLoader {
    /// Create a loader that knows no dependencies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `id` to `value`.
    #[must_use]
    pub fn with_value(self, id: impl Into<String>, value: impl Into<Value>) -> Self {
        self.state.lock().values.insert(id.into(), value.into());
        self
    }

    /// Fail every load of `id` with `message`.
    #[must_use]
    pub fn with_failure(self, id: impl Into<String>, message: impl Into<String>) -> Self {
        self.state.lock().failures.insert(id.into(), message.into());
        self
    }

    /// Every id loaded so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// How many times `id` was loaded.
    #[must_use]
    pub fn load_count(&self, id: &str) -> usize {
        self.state.lock().calls.iter().filter(|call| *call == id).count()
    }
}

#[async_trait]
impl DependencyLoader for RecordingLoader {
    async fn load(&self, id: &str) -> Result<Value, BoxError> {
        let mut state = self.state.lock();
        state.calls.push(id.to_owned());
        if let Some(message) = state.failures.get(id) {
            return Err(message.clone().into());
        }
        state
            .values
            .get(id)
            .cloned()
            .ok_or_else(|| format!("unknown dependency '{id}'").into())
    }
}
