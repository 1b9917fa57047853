//! Builder for [`ConfigService`].

use std::sync::Arc;

use super::ConfigService;
use crate::environment::Environment;
use crate::external::ExternalProvider;
use crate::loader::{DependencyLoader, NoDependencies};
use crate::merge::{ConfigMerge, DeepMerge};
use crate::resolve::{IdResolver, ModuleIdResolver};
use crate::sequence::OrdinalSequence;
use crate::store::RuleStore;

/// Builder for [`ConfigService`].
///
/// Collaborators default to [`ModuleIdResolver`], [`NoDependencies`] and
/// [`DeepMerge`]; without an external provider only registered rules
/// contribute configuration.
///
/// # Examples
///
/// ```rust
/// use module_config::{ConfigService, Environment, ModuleIdResolver};
///
/// let service = ConfigService::builder(Environment::builder().locale("en").build())
///     .id_resolver(ModuleIdResolver::new().alias("viz", "pentaho/visual"))
///     .first_ordinal(100)
///     .build();
/// assert_eq!(service.environment().get(module_config::Criterion::Locale), Some("en"));
/// ```
pub struct ConfigServiceBuilder {
    environment: Environment,
    id_resolver: Arc<dyn IdResolver>,
    dependency_loader: Arc<dyn DependencyLoader>,
    external_provider: Option<Arc<dyn ExternalProvider>>,
    merge: Arc<dyn ConfigMerge>,
    first_ordinal: u64,
}

impl ConfigServiceBuilder {
    /// Creates a builder for a service bound to `environment`.
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            id_resolver: Arc::new(ModuleIdResolver::new()),
            dependency_loader: Arc::new(NoDependencies),
            external_provider: None,
            merge: Arc::new(DeepMerge),
            first_ordinal: 0,
        }
    }

    /// Sets the resolver applied to identifiers at registration.
    #[must_use]
    pub fn id_resolver(mut self, resolver: impl IdResolver + 'static) -> Self {
        self.id_resolver = Arc::new(resolver);
        self
    }

    /// Sets the loader for factory dependencies.
    #[must_use]
    pub fn dependency_loader(mut self, loader: impl DependencyLoader + 'static) -> Self {
        self.dependency_loader = Arc::new(loader);
        self
    }

    /// Sets the external provider merged into module queries.
    #[must_use]
    pub fn external_provider(mut self, provider: impl ExternalProvider + 'static) -> Self {
        self.external_provider = Some(Arc::new(provider));
        self
    }

    /// Replaces the deep-merge primitive.
    #[must_use]
    pub fn merge(mut self, merge: impl ConfigMerge + 'static) -> Self {
        self.merge = Arc::new(merge);
        self
    }

    /// Sets the ordinal issued to the first registered rule.
    #[must_use]
    pub fn first_ordinal(mut self, ordinal: u64) -> Self {
        self.first_ordinal = ordinal;
        self
    }

    /// Finalises the builder and returns a [`ConfigService`].
    #[must_use]
    pub fn build(self) -> ConfigService {
        ConfigService {
            environment: self.environment,
            store: RuleStore::new(),
            ordinals: OrdinalSequence::starting_at(self.first_ordinal),
            id_resolver: self.id_resolver,
            dependency_loader: self.dependency_loader,
            external_provider: self.external_provider,
            merge: self.merge,
        }
    }
}
