//! The fixed runtime environment rules are matched against.
//!
//! An [`Environment`] is captured once per [`crate::ConfigService`] and never
//! changes afterwards. Each recognised [`Criterion`] either has a value or is
//! inapplicable to the current runtime.

use std::fmt;

use figment::{Figment, providers::Env};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{ConfigResult, ConfigResultExt};

/// Environment criteria recognised by rule selectors.
///
/// Variants are declared from the most generic to the most specific; see
/// [`Criterion::ALL`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum Criterion {
    /// The current user.
    User,
    /// The active theme.
    Theme,
    /// The active locale.
    Locale,
    /// The running application.
    Application,
}

impl Criterion {
    /// Every criterion, ordered from most generic to most specific.
    pub const ALL: [Self; 4] = [Self::User, Self::Theme, Self::Locale, Self::Application];

    /// Key used for this criterion in selectors and environment sources.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Theme => "theme",
            Self::Locale => "locale",
            Self::Application => "application",
        }
    }

    /// Iterate criteria from the most specific to the most generic.
    pub fn most_specific_first() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().rev()
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Read-only snapshot of the runtime values rules are matched against.
///
/// # Examples
///
/// ```
/// use module_config::{Criterion, Environment};
///
/// let env = Environment::builder()
///     .application("pentaho-cdf")
///     .locale("pt-PT")
///     .build();
/// assert_eq!(env.get(Criterion::Locale), Some("pt-PT"));
/// assert_eq!(env.get(Criterion::User), None);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct Environment {
    #[serde(default, deserialize_with = "scalar_string")]
    user: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    theme: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    locale: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    application: Option<String>,
}

impl Environment {
    /// Start building an environment.
    #[must_use]
    pub fn builder() -> EnvironmentBuilder {
        EnvironmentBuilder::default()
    }

    /// An environment in which every criterion is inapplicable.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Extract an environment from `figment`.
    ///
    /// Keys that are not criteria are ignored. Numbers and booleans are
    /// stored in their textual form.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Gathering`] when a criterion holds a
    /// non-scalar value or the providers fail.
    pub fn from_figment(figment: &Figment) -> ConfigResult<Self> {
        figment.extract().into_config()
    }

    /// Read criteria from process variables named `<prefix><CRITERION>`.
    ///
    /// ```rust,no_run
    /// use module_config::Environment;
    ///
    /// // Reads APP_USER, APP_THEME, APP_LOCALE and APP_APPLICATION.
    /// let env = Environment::from_env("APP_")?;
    /// # Ok::<_, std::sync::Arc<module_config::ConfigError>>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Gathering`] when extraction fails.
    pub fn from_env(prefix: &str) -> ConfigResult<Self> {
        Self::from_figment(&Figment::from(Env::prefixed(prefix)))
    }

    /// Value of `criterion`, or `None` when it does not apply.
    #[must_use]
    pub fn get(&self, criterion: Criterion) -> Option<&str> {
        match criterion {
            Criterion::User => self.user.as_deref(),
            Criterion::Theme => self.theme.as_deref(),
            Criterion::Locale => self.locale.as_deref(),
            Criterion::Application => self.application.as_deref(),
        }
    }
}

/// Builder for [`Environment`].
#[derive(Clone, Debug, Default)]
pub struct EnvironmentBuilder {
    inner: Environment,
}

impl EnvironmentBuilder {
    /// Set the value of `criterion`.
    #[must_use]
    pub fn with(mut self, criterion: Criterion, value: impl Into<String>) -> Self {
        let slot = match criterion {
            Criterion::User => &mut self.inner.user,
            Criterion::Theme => &mut self.inner.theme,
            Criterion::Locale => &mut self.inner.locale,
            Criterion::Application => &mut self.inner.application,
        };
        *slot = Some(value.into());
        self
    }

    /// Set the current user.
    #[must_use]
    pub fn user(self, value: impl Into<String>) -> Self {
        self.with(Criterion::User, value)
    }

    /// Set the active theme.
    #[must_use]
    pub fn theme(self, value: impl Into<String>) -> Self {
        self.with(Criterion::Theme, value)
    }

    /// Set the active locale.
    #[must_use]
    pub fn locale(self, value: impl Into<String>) -> Self {
        self.with(Criterion::Locale, value)
    }

    /// Set the running application.
    #[must_use]
    pub fn application(self, value: impl Into<String>) -> Self {
        self.with(Criterion::Application, value)
    }

    /// Finalise the environment.
    #[must_use]
    pub fn build(self) -> Environment {
        self.inner
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a scalar criterion value, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::{Format, Json};
    use rstest::rstest;

    #[rstest]
    #[case(Criterion::User, "user")]
    #[case(Criterion::Theme, "theme")]
    #[case(Criterion::Locale, "locale")]
    #[case(Criterion::Application, "application")]
    fn criterion_keys(#[case] criterion: Criterion, #[case] key: &str) {
        assert_eq!(criterion.key(), key);
        assert_eq!(criterion.to_string(), key);
    }

    #[test]
    fn most_specific_first_starts_with_application() {
        let order: Vec<_> = Criterion::most_specific_first().collect();
        assert_eq!(
            order,
            vec![
                Criterion::Application,
                Criterion::Locale,
                Criterion::Theme,
                Criterion::User
            ]
        );
    }

    #[test]
    fn from_figment_stringifies_scalars_and_ignores_other_keys() {
        let figment = Figment::from(Json::string(
            r#"{"user": 42, "theme": "crystal", "locale": null, "unrelated": [1]}"#,
        ));
        let env = Environment::from_figment(&figment).expect("environment extracts");
        assert_eq!(env.get(Criterion::User), Some("42"));
        assert_eq!(env.get(Criterion::Theme), Some("crystal"));
        assert_eq!(env.get(Criterion::Locale), None);
        assert_eq!(env.get(Criterion::Application), None);
    }

    #[test]
    fn from_figment_rejects_structured_criteria() {
        let figment = Figment::from(Json::string(r#"{"locale": {"lang": "en"}}"#));
        let err = Environment::from_figment(&figment).expect_err("object locale is rejected");
        assert!(matches!(&*err, crate::ConfigError::Gathering(_)));
    }

    #[test]
    fn from_env_reads_prefixed_variables() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("MODCONF_LOCALE", "en-GB");
            jail.set_env("MODCONF_APPLICATION", "analyzer");
            let env = Environment::from_env("MODCONF_")
                .map_err(|e| figment::Error::from(e.to_string()))?;
            assert_eq!(env.get(Criterion::Locale), Some("en-GB"));
            assert_eq!(env.get(Criterion::Application), Some("analyzer"));
            assert_eq!(env.get(Criterion::Theme), None);
            Ok(())
        });
    }
}
