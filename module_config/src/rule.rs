//! Rules, rule sets and the immutable form the store keeps.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::BoxError;
use crate::selector::Selector;

type FactoryFn = dyn Fn(&[Value]) -> Result<Value, BoxError> + Send + Sync;

/// Producer of a configuration fragment from loaded dependency values.
///
/// The closure receives the values of [`ConfigFactory::dependencies`], in
/// declaration order.
///
/// # Examples
///
/// ```
/// use module_config::ConfigFactory;
/// use serde_json::json;
///
/// let factory = ConfigFactory::new(["pentaho/util/theme"], |values| {
///     Ok(json!({ "theme": values.first().cloned() }))
/// });
/// assert_eq!(factory.dependencies(), ["pentaho/util/theme"]);
/// ```
#[derive(Clone)]
pub struct ConfigFactory {
    dependencies: Vec<String>,
    produce: Arc<FactoryFn>,
}

impl ConfigFactory {
    /// Create a factory that needs `dependencies` loaded before it runs.
    pub fn new<I, S, F>(dependencies: I, produce: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&[Value]) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            produce: Arc::new(produce),
        }
    }

    /// Declared dependency identifiers.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Run the factory against the values of its own dependencies.
    ///
    /// # Errors
    ///
    /// Propagates whatever the factory returns.
    pub fn produce(&self, values: &[Value]) -> Result<Value, BoxError> {
        (self.produce)(values)
    }

    pub(crate) fn with_dependencies(&self, dependencies: Vec<String>) -> Self {
        Self {
            dependencies,
            produce: Arc::clone(&self.produce),
        }
    }
}

impl fmt::Debug for ConfigFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFactory")
            .field("dependencies", &self.dependencies)
            .field("produce", &"<closure>")
            .finish()
    }
}

/// Payload of a rule.
#[derive(Clone, Debug)]
pub enum ConfigSource {
    /// A fixed configuration fragment.
    Constant(Value),
    /// A fragment computed from asynchronously loaded dependencies.
    Factory(ConfigFactory),
}

impl ConfigSource {
    /// Dependencies that must load before this source yields a fragment.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        match self {
            Self::Constant(_) => &[],
            Self::Factory(factory) => factory.dependencies(),
        }
    }
}

impl From<Value> for ConfigSource {
    fn from(value: Value) -> Self {
        Self::Constant(value)
    }
}

impl From<ConfigFactory> for ConfigSource {
    fn from(factory: ConfigFactory) -> Self {
        Self::Factory(factory)
    }
}

impl<'de> Deserialize<'de> for ConfigSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::Constant)
    }
}

/// A configuration rule as supplied by callers.
///
/// # Examples
///
/// ```
/// use module_config::{Rule, Selector};
/// use serde_json::json;
///
/// let rule = Rule::new(Selector::module("m"), json!({"a": 1})).with_priority(-10);
/// assert_eq!(rule.priority(), -10);
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    select: Selector,
    apply: ConfigSource,
    #[serde(default)]
    priority: i64,
}

impl Rule {
    /// Create a rule with the default priority of zero.
    pub fn new(select: Selector, apply: impl Into<ConfigSource>) -> Self {
        Self {
            select,
            apply: apply.into(),
            priority: 0,
        }
    }

    /// Override the rule's priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// Selection criteria.
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.select
    }

    /// Payload.
    #[must_use]
    pub const fn source(&self) -> &ConfigSource {
        &self.apply
    }

    /// Numeric priority.
    #[must_use]
    pub const fn priority(&self) -> i64 {
        self.priority
    }

    pub(crate) fn into_parts(self) -> (Selector, ConfigSource) {
        (self.select, self.apply)
    }
}

/// Rules sharing a context identifier used to resolve relative ids.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    /// Identifier relative ids are resolved against.
    #[serde(default, alias = "contextId")]
    pub context_id: Option<String>,
    /// Rules in registration order.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl RuleSet {
    /// Create a rule set without a context identifier.
    #[must_use]
    pub const fn new(rules: Vec<Rule>) -> Self {
        Self {
            context_id: None,
            rules,
        }
    }

    /// Set the context identifier.
    #[must_use]
    pub fn context(mut self, context_id: impl Into<String>) -> Self {
        self.context_id = Some(context_id.into());
        self
    }
}

/// A rule after registration: identifiers resolved and ordinal assigned.
#[derive(Clone, Debug)]
pub struct RegisteredRule {
    pub(crate) ordinal: u64,
    pub(crate) priority: i64,
    pub(crate) select: Selector,
    pub(crate) source: ConfigSource,
}

impl RegisteredRule {
    /// Registration sequence number.
    #[must_use]
    pub const fn ordinal(&self) -> u64 {
        self.ordinal
    }

    /// Numeric priority.
    #[must_use]
    pub const fn priority(&self) -> i64 {
        self.priority
    }

    /// Selector with module, annotation and application ids resolved.
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.select
    }

    /// Payload with dependency ids resolved.
    #[must_use]
    pub const fn source(&self) -> &ConfigSource {
        &self.source
    }
}
