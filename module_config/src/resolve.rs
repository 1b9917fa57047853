//! Identifier resolution applied to rules at registration time.

use std::collections::HashMap;

use crate::{ConfigError, ConfigResult};

/// Resolves module, annotation, application and dependency identifiers.
///
/// Implementations must be synchronous and free of side effects.
pub trait IdResolver: Send + Sync {
    /// Resolve `id` relative to `context_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnresolvedIdentifier`] when `id` cannot be
    /// resolved. Registration of the rule that named it is abandoned.
    fn resolve(&self, id: &str, context_id: Option<&str>) -> ConfigResult<String>;
}

/// Resolver for slash-separated module identifiers.
///
/// Ids starting with `./` or `../` are resolved against the directory of
/// the context id, then the alias table is consulted for the full id.
///
/// # Examples
///
/// ```
/// use module_config::{IdResolver, ModuleIdResolver};
///
/// let resolver = ModuleIdResolver::new().alias("theme", "pentaho/theme/crystal");
/// assert_eq!(
///     resolver.resolve("./models/Bar", Some("pentaho/visual/config"))?,
///     "pentaho/visual/models/Bar"
/// );
/// assert_eq!(resolver.resolve("theme", None)?, "pentaho/theme/crystal");
/// assert!(resolver.resolve("../x", None).is_err());
/// # Ok::<_, std::sync::Arc<module_config::ConfigError>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct ModuleIdResolver {
    aliases: HashMap<String, String>,
}

impl ModuleIdResolver {
    /// Create a resolver without aliases.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `alias` to `target` after relative resolution.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), target.into());
        self
    }

    fn is_relative(id: &str) -> bool {
        matches!(id, "." | "..") || id.starts_with("./") || id.starts_with("../")
    }

    fn join(id: &str, context_id: &str) -> ConfigResult<String> {
        let mut segments: Vec<&str> = context_id.split('/').collect();
        segments.pop();
        for segment in id.split('/') {
            match segment {
                "." | "" => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(ConfigError::unresolved(
                            id,
                            format!("climbs above the root of '{context_id}'"),
                        ));
                    }
                }
                other => segments.push(other),
            }
        }
        Ok(segments.join("/"))
    }
}

impl IdResolver for ModuleIdResolver {
    fn resolve(&self, id: &str, context_id: Option<&str>) -> ConfigResult<String> {
        if id.is_empty() {
            return Err(ConfigError::unresolved(id, "identifier is empty"));
        }
        let absolute = if Self::is_relative(id) {
            let context = context_id.ok_or_else(|| {
                ConfigError::unresolved(id, "relative identifier without a context id")
            })?;
            Self::join(id, context)?
        } else {
            id.to_owned()
        };
        Ok(self.aliases.get(&absolute).cloned().unwrap_or(absolute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::absolute("pentaho/type/string", None, "pentaho/type/string")]
    #[case::sibling("./Bar", Some("pentaho/visual/models/config"), "pentaho/visual/models/Bar")]
    #[case::parent("../util/dom", Some("pentaho/visual/models/config"), "pentaho/visual/util/dom")]
    #[case::dot_segments("./a/./b", Some("root/ctx"), "root/a/b")]
    #[case::bare_dot(".", Some("pentaho/visual/models/config"), "pentaho/visual/models")]
    #[case::bare_parent("..", Some("pentaho/visual/models/config"), "pentaho/visual")]
    fn resolves(#[case] id: &str, #[case] context: Option<&str>, #[case] expected: &str) {
        let resolved = ModuleIdResolver::new()
            .resolve(id, context)
            .expect("identifier resolves");
        assert_eq!(resolved, expected);
    }

    #[rstest]
    #[case::relative_without_context("./Bar", None)]
    #[case::bare_dot_without_context(".", None)]
    #[case::bare_parent_without_context("..", None)]
    #[case::climbs_too_far("../../x", Some("ctx"))]
    #[case::empty("", None)]
    fn rejects(#[case] id: &str, #[case] context: Option<&str>) {
        let err = ModuleIdResolver::new()
            .resolve(id, context)
            .expect_err("identifier is rejected");
        assert!(matches!(&*err, ConfigError::UnresolvedIdentifier { .. }));
    }

    #[test]
    fn aliases_apply_after_relative_resolution() {
        let resolver = ModuleIdResolver::new().alias("app/theme", "pentaho/theme/ruby");
        assert_eq!(
            resolver.resolve("./theme", Some("app/config")).expect("alias resolves"),
            "pentaho/theme/ruby"
        );
    }
}
