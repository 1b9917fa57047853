//! The configuration service: rule registration and module queries.
//!
//! A [`ConfigService`] is bound to one [`Environment`] for its whole life.
//! Rules that cannot apply in that environment are dropped when they are
//! registered; the remaining rules are filed per module (and annotation) in
//! ascending specificity so a query only has to load dependencies, produce
//! fragments and merge them in list order.
//!
//! # Example
//!
//! ```rust
//! use module_config::{ConfigService, Criterion, Environment, Rule, Selector};
//! use serde_json::json;
//!
//! # futures::executor::block_on(async {
//! let env = Environment::builder().application("app1").build();
//! let mut service = ConfigService::new(env);
//! service.add_rule(Rule::new(Selector::module("m"), json!({"a": 1})), None)?;
//! service.add_rule(
//!     Rule::new(
//!         Selector::module("m").with(Criterion::Application, "app1"),
//!         json!({"a": 2, "b": 1}),
//!     ),
//!     None,
//! )?;
//!
//! let config = service.select("m", None).await?;
//! assert_eq!(config, json!({"a": 2, "b": 1}));
//! # Ok::<_, std::sync::Arc<module_config::ConfigError>>(())
//! # }).expect("query succeeds");
//! ```

mod builder;
mod plan;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

pub use builder::ConfigServiceBuilder;
use plan::ResolutionPlan;

use crate::environment::{Criterion, Environment};
use crate::external::{self, ExternalProvider};
use crate::file;
use crate::loader::DependencyLoader;
use crate::merge::{ConfigMerge, merge_fragments};
use crate::resolve::IdResolver;
use crate::rule::{ConfigSource, RegisteredRule, Rule, RuleSet};
use crate::selector::CriterionValue;
use crate::sequence::OrdinalSequence;
use crate::store::RuleStore;
use crate::{ConfigError, ConfigResult};

/// Resolves merged configuration for modules from registered rules.
pub struct ConfigService {
    environment: Environment,
    store: RuleStore,
    ordinals: OrdinalSequence,
    id_resolver: Arc<dyn IdResolver>,
    dependency_loader: Arc<dyn DependencyLoader>,
    external_provider: Option<Arc<dyn ExternalProvider>>,
    merge: Arc<dyn ConfigMerge>,
}

impl ConfigService {
    /// Creates a service with default collaborators.
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self::builder(environment).build()
    }

    /// Starts building a service bound to `environment`.
    #[must_use]
    pub fn builder(environment: Environment) -> ConfigServiceBuilder {
        ConfigServiceBuilder::new(environment)
    }

    /// The environment rules are matched against.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Registers `rule`, resolving relative identifiers against `context_id`.
    ///
    /// A rule whose selector the environment rules out is accepted and
    /// discarded. Every call consumes an ordinal, whether or not the rule is
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingArgument`] when the selector names no
    /// module or an empty one, [`ConfigError::UnresolvedIdentifier`] when an
    /// identifier cannot be resolved, and [`ConfigError::OrdinalsExhausted`]
    /// once every ordinal has been issued. The store is left unchanged.
    pub fn add_rule(&mut self, rule: Rule, context_id: Option<&str>) -> ConfigResult<()> {
        let ordinal = self
            .ordinals
            .issue()
            .ok_or_else(ConfigError::ordinals_exhausted)?;
        let registered = self.prepare(ordinal, rule, context_id)?;

        if !registered.select.is_reachable(&self.environment) {
            debug!(
                ordinal,
                modules = ?registered.select.module_ids(),
                "discarding rule unreachable in this environment"
            );
            return Ok(());
        }

        let shared = Arc::new(registered);
        for module_id in shared.select.module_ids() {
            debug!(
                ordinal,
                module = %module_id,
                annotation = ?shared.select.annotation_id(),
                priority = shared.priority,
                "filing rule"
            );
            self.store.insert(module_id, Arc::clone(&shared));
        }
        Ok(())
    }

    /// Registers every rule of `rule_set` in order.
    ///
    /// A failing rule does not prevent later rules from registering.
    ///
    /// # Errors
    ///
    /// Returns the failure of the single failing rule, or
    /// [`ConfigError::Aggregate`] when several rules failed.
    pub fn add_rule_set(&mut self, rule_set: RuleSet) -> ConfigResult<()> {
        let RuleSet { context_id, rules } = rule_set;
        let errors: Vec<Arc<ConfigError>> = rules
            .into_iter()
            .filter_map(|rule| self.add_rule(rule, context_id.as_deref()).err())
            .collect();
        ConfigError::try_aggregate(errors).map_or(Ok(()), |err| Err(Arc::new(err)))
    }

    /// Reads a rule set from `path` and registers it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::File`] when the file cannot be read or parsed,
    /// otherwise the errors of [`ConfigService::add_rule_set`].
    pub fn load_rule_set_file(&mut self, path: &Path) -> ConfigResult<()> {
        let rule_set = file::load_rule_set(path)?;
        self.add_rule_set(rule_set)
    }

    /// Resolves the merged configuration of `module_id`, or of its
    /// `annotation_id` annotation when given.
    ///
    /// Rules merge from least to most specific. Module queries also consult
    /// the external provider, if one is configured; annotation queries never
    /// do. A module nobody configured resolves to `{}`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DependencyLoad`], [`ConfigError::Factory`] or
    /// [`ConfigError::ExternalProvider`] when a collaborator fails.
    pub async fn select(&self, module_id: &str, annotation_id: Option<&str>) -> ConfigResult<Value> {
        let plan = self
            .store
            .rules(module_id, annotation_id)
            .map(ResolutionPlan::new);
        let internal = async {
            match plan {
                Some(plan) => plan
                    .run(module_id, self.dependency_loader.as_ref())
                    .await
                    .map(Some),
                None => Ok(None),
            }
        };

        let fragments = match (&self.external_provider, annotation_id) {
            (Some(provider), None) => {
                let external = async {
                    provider
                        .select_external(module_id)
                        .await
                        .map_err(|source| ConfigError::external(module_id, source))
                };
                let (local, remote) = futures::try_join!(internal, external)?;
                external::combine(local, remote)
            }
            _ => internal.await?.unwrap_or_default(),
        };

        Ok(merge_fragments(self.merge.as_ref(), module_id, fragments))
    }

    /// Rules filed for `module_id` (or its `annotation_id` annotation), least
    /// specific first.
    #[must_use]
    pub fn rules(
        &self,
        module_id: &str,
        annotation_id: Option<&str>,
    ) -> Option<&[Arc<RegisteredRule>]> {
        self.store.rules(module_id, annotation_id)
    }

    /// Annotation ids with rules for `module_id`, or `None` when it has none.
    #[must_use]
    pub fn annotation_ids(&self, module_id: &str) -> Option<&[String]> {
        self.store.annotation_ids(module_id)
    }

    /// Whether `module_id` has rules for `annotation_id`.
    ///
    /// Returns `None` when the module has no annotation rules at all.
    #[must_use]
    pub fn has_annotation(&self, module_id: &str, annotation_id: &str) -> Option<bool> {
        self.store.has_annotation(module_id, annotation_id)
    }

    fn prepare(
        &self,
        ordinal: u64,
        rule: Rule,
        context_id: Option<&str>,
    ) -> ConfigResult<RegisteredRule> {
        let priority = rule.priority();
        let (mut select, source) = rule.into_parts();

        let module_ids = select.module_ids();
        if module_ids.is_empty() || module_ids.iter().any(String::is_empty) {
            return Err(ConfigError::missing_argument("select.module"));
        }

        let mut modules: Vec<String> = Vec::with_capacity(module_ids.len());
        for id in module_ids {
            let resolved = self.resolve(id, context_id)?;
            if !modules.contains(&resolved) {
                modules.push(resolved);
            }
        }
        let annotation = select
            .annotation_id()
            .map(|id| self.resolve(id, context_id))
            .transpose()?;
        let application = select
            .criterion(Criterion::Application)
            .map(|value| self.resolve_criterion(value, context_id))
            .transpose()?;
        let resolved_source = match source {
            ConfigSource::Factory(factory) => {
                let dependencies = factory
                    .dependencies()
                    .iter()
                    .map(|id| self.resolve(id, context_id))
                    .collect::<ConfigResult<Vec<_>>>()?;
                ConfigSource::Factory(factory.with_dependencies(dependencies))
            }
            constant @ ConfigSource::Constant(_) => constant,
        };

        select.set_modules(modules);
        select.set_annotation(annotation);
        *select.slot_mut(Criterion::Application) = application;

        Ok(RegisteredRule {
            ordinal,
            priority,
            select,
            source: resolved_source,
        })
    }

    fn resolve(&self, id: &str, context_id: Option<&str>) -> ConfigResult<String> {
        self.id_resolver.resolve(id, context_id)
    }

    fn resolve_criterion(
        &self,
        value: &CriterionValue,
        context_id: Option<&str>,
    ) -> ConfigResult<CriterionValue> {
        Ok(match value {
            CriterionValue::One(id) => CriterionValue::One(self.resolve(id, context_id)?),
            CriterionValue::AnyOf(ids) => CriterionValue::AnyOf(
                ids.iter()
                    .map(|id| self.resolve(id, context_id))
                    .collect::<ConfigResult<_>>()?,
            ),
        })
    }
}

impl fmt::Debug for ConfigService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigService")
            .field("environment", &self.environment)
            .field("store", &self.store)
            .field("ordinals", &self.ordinals)
            .field("external_provider", &self.external_provider.is_some())
            .finish_non_exhaustive()
    }
}
