//! Reading declarative rule sets from configuration files.

mod parser;

use std::path::Path;

use crate::rule::RuleSet;
use crate::{ConfigError, ConfigResult};

use parser::parse_rule_set_by_format;

/// Load a [`RuleSet`] from `path`, selecting the parser by extension.
///
/// `.json` files are read as JSON, `.yaml`/`.yml` as YAML (with the `yaml`
/// feature) and anything else as TOML (with the default `toml` feature).
/// Rules read from files always carry constant payloads.
///
/// # Examples
///
/// ```rust,no_run
/// use module_config::load_rule_set;
/// use std::path::Path;
///
/// let rule_set = load_rule_set(Path::new("config/rules.toml"))?;
/// println!("{} rules", rule_set.rules.len());
/// # Ok::<_, std::sync::Arc<module_config::ConfigError>>(())
/// ```
///
/// # Errors
///
/// Returns [`ConfigError::File`] when the file cannot be read, parsed or
/// mapped onto a rule set.
pub fn load_rule_set(path: &Path) -> ConfigResult<RuleSet> {
    let data = std::fs::read_to_string(path).map_err(|e| ConfigError::file(path, e))?;
    let figment = parse_rule_set_by_format(path, &data)?;
    figment.extract().map_err(|e| ConfigError::file(path, e))
}
