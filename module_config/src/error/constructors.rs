//! Constructors and aggregation helpers for `ConfigError`.

use std::path::Path;
use std::sync::Arc;

use super::types::BoxError;
use super::{AggregatedErrors, ConfigError};

impl ConfigError {
    /// Tries to build a [`ConfigError`] from an iterator of errors.
    ///
    /// Returns `None` when no errors are supplied, the inner error when a
    /// single uniquely owned [`Arc`] is supplied, and [`Self::Aggregate`]
    /// otherwise.
    #[must_use]
    pub fn try_aggregate<I, E>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        let mut arcs: Vec<Arc<Self>> = errors.into_iter().map(Into::into).collect();
        if arcs.is_empty() {
            return None;
        }
        Some(if arcs.len() == 1 {
            let last = arcs.pop()?;
            match Arc::try_unwrap(last) {
                Ok(err) => err,
                Err(shared) => Self::Aggregate(Box::new(AggregatedErrors::new(vec![shared]))),
            }
        } else {
            Self::Aggregate(Box::new(AggregatedErrors::new(arcs)))
        })
    }

    /// Construct a missing-argument error wrapped in an [`Arc`].
    ///
    /// # Examples
    ///
    /// ```
    /// use module_config::ConfigError;
    ///
    /// let e = ConfigError::missing_argument("select.module");
    /// assert!(matches!(&*e, ConfigError::MissingArgument { argument } if argument == "select.module"));
    /// ```
    #[must_use]
    pub fn missing_argument(argument: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::MissingArgument {
            argument: argument.into(),
        })
    }

    /// Construct an ordinal-exhaustion error wrapped in an [`Arc`].
    #[must_use]
    pub fn ordinals_exhausted() -> Arc<Self> {
        Arc::new(Self::OrdinalsExhausted)
    }

    /// Construct an unresolved-identifier error wrapped in an [`Arc`].
    #[must_use]
    pub fn unresolved(id: impl Into<String>, reason: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::UnresolvedIdentifier {
            id: id.into(),
            reason: reason.into(),
        })
    }

    /// Construct a dependency-load error wrapped in an [`Arc`].
    #[must_use]
    pub fn dependency_load(id: impl Into<String>, source: impl Into<BoxError>) -> Arc<Self> {
        Arc::new(Self::DependencyLoad {
            id: id.into(),
            source: source.into(),
        })
    }

    /// Construct an external-provider error wrapped in an [`Arc`].
    #[must_use]
    pub fn external(module: impl Into<String>, source: impl Into<BoxError>) -> Arc<Self> {
        Arc::new(Self::ExternalProvider {
            module: module.into(),
            source: source.into(),
        })
    }

    /// Construct a factory error wrapped in an [`Arc`].
    #[must_use]
    pub fn factory(module: impl Into<String>, source: impl Into<BoxError>) -> Arc<Self> {
        Arc::new(Self::Factory {
            module: module.into(),
            source: source.into(),
        })
    }

    /// Construct a rule-set file error wrapped in an [`Arc`].
    #[must_use]
    pub fn file(path: &Path, source: impl Into<BoxError>) -> Arc<Self> {
        Arc::new(Self::File {
            path: path.to_path_buf(),
            source: source.into(),
        })
    }
}
