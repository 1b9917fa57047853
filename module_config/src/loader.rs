//! Asynchronous loading of factory dependencies.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BoxError;

/// Loads the value of a dependency named by a configuration factory.
///
/// The service calls [`DependencyLoader::load`] at most once per distinct id
/// per query, and runs the loads of one query concurrently.
#[async_trait]
pub trait DependencyLoader: Send + Sync {
    /// Load dependency `id`.
    ///
    /// # Errors
    ///
    /// Any error rejects the query that requested the dependency.
    async fn load(&self, id: &str) -> Result<Value, BoxError>;
}

/// Loader used when none is configured; every load fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDependencies;

#[async_trait]
impl DependencyLoader for NoDependencies {
    async fn load(&self, id: &str) -> Result<Value, BoxError> {
        Err(format!("no dependency loader configured to load '{id}'").into())
    }
}
