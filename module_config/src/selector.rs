//! Rule selectors and the registration-time environment filter.

use serde::{Deserialize, Deserializer};

use crate::environment::{Criterion, Environment};

/// Constraint on a single environment criterion.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
pub enum CriterionValue {
    /// The environment value must equal this value.
    One(String),
    /// The environment value must be one of these values.
    AnyOf(Vec<String>),
}

impl CriterionValue {
    /// Build an "any of" constraint.
    pub fn any_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyOf(values.into_iter().map(Into::into).collect())
    }

    /// Whether `value` satisfies this constraint.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::One(expected) => expected == value,
            Self::AnyOf(options) => options.iter().any(|option| option == value),
        }
    }

    /// Iterate over the values named by this constraint.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice = match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::AnyOf(values) => values.as_slice(),
        };
        slice.iter().map(String::as_str)
    }
}

impl From<&str> for CriterionValue {
    fn from(value: &str) -> Self {
        Self::One(value.to_owned())
    }
}

impl From<String> for CriterionValue {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for CriterionValue {
    fn from(values: Vec<String>) -> Self {
        Self::AnyOf(values)
    }
}

/// Selection criteria of a rule.
///
/// `module` names the modules the rule configures; `annotation` optionally
/// narrows it to configuration of an annotation type on those modules. The
/// remaining slots constrain the [`Environment`].
///
/// # Examples
///
/// ```
/// use module_config::{Criterion, CriterionValue, Selector};
///
/// let selector = Selector::module("pentaho/visual/models/Bar")
///     .with(Criterion::Application, "pentaho-analyzer")
///     .with(Criterion::Locale, CriterionValue::any_of(["en", "en-US"]));
/// assert_eq!(selector.criterion(Criterion::Theme), None);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Selector {
    #[serde(default, deserialize_with = "one_or_many")]
    module: Vec<String>,
    #[serde(default)]
    annotation: Option<String>,
    #[serde(default)]
    user: Option<CriterionValue>,
    #[serde(default)]
    theme: Option<CriterionValue>,
    #[serde(default)]
    locale: Option<CriterionValue>,
    #[serde(default)]
    application: Option<CriterionValue>,
}

impl Selector {
    /// Selector for a single module.
    #[must_use]
    pub fn module(id: impl Into<String>) -> Self {
        Self {
            module: vec![id.into()],
            ..Self::default()
        }
    }

    /// Selector for several modules.
    pub fn modules<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            module: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Narrow the selector to an annotation type.
    #[must_use]
    pub fn annotation(mut self, id: impl Into<String>) -> Self {
        self.annotation = Some(id.into());
        self
    }

    /// Constrain `criterion`.
    #[must_use]
    pub fn with(mut self, criterion: Criterion, value: impl Into<CriterionValue>) -> Self {
        *self.slot_mut(criterion) = Some(value.into());
        self
    }

    /// Module identifiers, as written.
    #[must_use]
    pub fn module_ids(&self) -> &[String] {
        &self.module
    }

    /// Annotation identifier, as written.
    #[must_use]
    pub fn annotation_id(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    /// Constraint on `criterion`, if any.
    #[must_use]
    pub const fn criterion(&self, criterion: Criterion) -> Option<&CriterionValue> {
        match criterion {
            Criterion::User => self.user.as_ref(),
            Criterion::Theme => self.theme.as_ref(),
            Criterion::Locale => self.locale.as_ref(),
            Criterion::Application => self.application.as_ref(),
        }
    }

    pub(crate) fn set_modules(&mut self, ids: Vec<String>) {
        self.module = ids;
    }

    pub(crate) fn set_annotation(&mut self, id: Option<String>) {
        self.annotation = id;
    }

    pub(crate) const fn slot_mut(&mut self, criterion: Criterion) -> &mut Option<CriterionValue> {
        match criterion {
            Criterion::User => &mut self.user,
            Criterion::Theme => &mut self.theme,
            Criterion::Locale => &mut self.locale,
            Criterion::Application => &mut self.application,
        }
    }

    /// Whether a rule with this selector can ever apply in `env`.
    ///
    /// A criterion only disqualifies the selector when both the selector and
    /// the environment define it and the environment value is not accepted.
    ///
    /// ```
    /// use module_config::{Criterion, Environment, Selector};
    ///
    /// let env = Environment::builder().locale("en").build();
    /// assert!(Selector::module("m").is_reachable(&env));
    /// assert!(!Selector::module("m").with(Criterion::Locale, "pt").is_reachable(&env));
    /// assert!(Selector::module("m").with(Criterion::User, "ana").is_reachable(&env));
    /// ```
    #[must_use]
    pub fn is_reachable(&self, env: &Environment) -> bool {
        Criterion::ALL.into_iter().all(|criterion| {
            match (self.criterion(criterion), env.get(criterion)) {
                (Some(constraint), Some(value)) => constraint.accepts(value),
                _ => true,
            }
        })
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(id) => vec![id],
        OneOrMany::Many(ids) => ids,
    })
}
