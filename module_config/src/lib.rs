//! Module-scoped configuration rules resolved against a fixed environment.
//!
//! Applications register [`Rule`]s that contribute configuration to one or
//! more modules, optionally only for a given user, theme, locale or
//! application. A [`ConfigService`] bound to the runtime [`Environment`]
//! files each applicable rule by specificity and, on request, merges the
//! fragments of every rule for a module into one JSON object. Fragments
//! may be constant or computed by a [`ConfigFactory`] from asynchronously
//! loaded dependencies, and may be combined with prioritised fragments
//! from an [`ExternalProvider`].
//!
//! ```rust
//! use module_config::{ConfigFactory, ConfigService, Environment, Rule, Selector};
//! use serde_json::json;
//!
//! struct Constants;
//!
//! #[async_trait::async_trait]
//! impl module_config::DependencyLoader for Constants {
//!     async fn load(&self, _id: &str) -> Result<serde_json::Value, module_config::BoxError> {
//!         Ok(json!(5))
//!     }
//! }
//!
//! # futures::executor::block_on(async {
//! let mut service = ConfigService::builder(Environment::empty())
//!     .dependency_loader(Constants)
//!     .build();
//! service.add_rule(
//!     Rule::new(
//!         Selector::module("m"),
//!         ConfigFactory::new(["d1"], |values| Ok(json!({ "a": values.first().cloned() }))),
//!     ),
//!     None,
//! )?;
//! assert_eq!(service.select("m", None).await?, json!({"a": 5}));
//! # Ok::<_, std::sync::Arc<module_config::ConfigError>>(())
//! # }).expect("query succeeds");
//! ```

use std::sync::Arc;

mod environment;
mod error;
mod external;
mod file;
mod loader;
mod merge;
mod resolve;
mod result_ext;
mod rule;
mod selector;
mod sequence;
mod service;
mod specificity;
mod store;

pub use environment::{Criterion, Environment, EnvironmentBuilder};
pub use error::{AggregatedErrors, BoxError, ConfigError};
pub use external::{ExternalProvider, PrioritizedConfig};
pub use file::load_rule_set;
pub use loader::{DependencyLoader, NoDependencies};
pub use merge::{ConfigMerge, DeepMerge, merge_value};
pub use resolve::{IdResolver, ModuleIdResolver};
pub use result_ext::ConfigResultExt;
pub use rule::{ConfigFactory, ConfigSource, RegisteredRule, Rule, RuleSet};
pub use selector::{CriterionValue, Selector};
pub use sequence::OrdinalSequence;
pub use service::{ConfigService, ConfigServiceBuilder};
pub use specificity::compare as compare_specificity;
pub use store::{RuleStore, store_key};

/// Result type used throughout the crate.
///
/// Errors are shared behind an [`Arc`] so they can be aggregated and cloned
/// cheaply.
pub type ConfigResult<T> = Result<T, Arc<ConfigError>>;
