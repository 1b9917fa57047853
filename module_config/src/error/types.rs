//! Primary error enum for rule registration and configuration queries.

use figment::Error as FigmentError;
use thiserror::Error;

use super::aggregate::AggregatedErrors;

/// Boxed error type accepted from collaborators and configuration factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while registering rules or selecting configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required argument was absent or empty.
    #[error("missing required argument '{argument}'")]
    MissingArgument {
        /// Name of the argument, for example `select.module`.
        argument: String,
    },

    /// Every registration ordinal has been issued.
    #[error("registration ordinals exhausted")]
    OrdinalsExhausted,

    /// A module, annotation or dependency identifier could not be resolved.
    #[error("cannot resolve identifier '{id}': {reason}")]
    UnresolvedIdentifier {
        /// Identifier as written in the rule.
        id: String,
        /// Human-readable explanation of the failure.
        reason: String,
    },

    /// A dependency requested by a configuration factory failed to load.
    #[error("failed to load dependency '{id}': {source}")]
    DependencyLoad {
        /// Resolved dependency identifier.
        id: String,
        /// Underlying error reported by the loader.
        #[source]
        source: BoxError,
    },

    /// The external provider failed to produce configuration for a module.
    #[error("external configuration for '{module}' failed: {source}")]
    ExternalProvider {
        /// Module whose configuration was requested.
        module: String,
        /// Underlying error reported by the provider.
        #[source]
        source: BoxError,
    },

    /// A configuration factory returned an error.
    #[error("configuration factory for '{module}' failed: {source}")]
    Factory {
        /// Module whose configuration was being produced.
        module: String,
        /// Underlying error returned by the factory.
        #[source]
        source: BoxError,
    },

    /// Error originating from a rule-set file.
    #[error("rule set file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: std::path::PathBuf,
        /// Underlying error reported by the reader or parser.
        #[source]
        source: BoxError,
    },

    /// Error while gathering environment values from providers.
    #[error("failed to gather environment: {0}")]
    Gathering(#[from] Box<FigmentError>),

    /// Multiple errors occurred while registering a rule set.
    #[error("multiple rule registration errors:\n{0}")]
    Aggregate(Box<AggregatedErrors>),
}
