//! Format-specific parsing of rule-set files.

use std::path::Path;

use figment::{
    Figment,
    providers::{Format, Json},
};

use crate::{ConfigError, ConfigResult};

/// Parse rule-set data according to the file extension.
///
/// # Errors
///
/// Returns [`ConfigError::File`] if the contents fail to parse or the
/// feature for the format is disabled.
pub(super) fn parse_rule_set_by_format(path: &Path, data: &str) -> ConfigResult<Figment> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("json") => {
            serde_json::from_str::<serde_json::Value>(data)
                .map_err(|e| ConfigError::file(path, e))?;
            Ok(Figment::from(Json::string(data)))
        }
        Some("yaml" | "yml") => parse_yaml(path, data),
        _ => parse_toml(path, data),
    }
}

#[cfg(feature = "yaml")]
fn parse_yaml(path: &Path, data: &str) -> ConfigResult<Figment> {
    use figment::providers::Serialized;
    use figment::value::Value as FigmentValue;
    use serde_saphyr::Options;

    let value: FigmentValue = serde_saphyr::from_str_with_options(
        data,
        Options {
            strict_booleans: true,
            ..Options::default()
        },
    )
    .map_err(|e| ConfigError::file(path, e.to_string()))?;
    Ok(Figment::from(Serialized::defaults(value)))
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(path: &Path, _data: &str) -> ConfigResult<Figment> {
    Err(ConfigError::file(
        path,
        std::io::Error::other(
            "yaml feature disabled: enable the 'yaml' feature to support this file format",
        ),
    ))
}

#[cfg(feature = "toml")]
fn parse_toml(path: &Path, data: &str) -> ConfigResult<Figment> {
    use figment::providers::Toml;

    // Validate first so parse failures carry this file's path.
    toml::from_str::<toml::Value>(data).map_err(|e| ConfigError::file(path, e))?;
    Ok(Figment::from(Toml::string(data)))
}

#[cfg(not(feature = "toml"))]
fn parse_toml(path: &Path, _data: &str) -> ConfigResult<Figment> {
    Err(ConfigError::file(
        path,
        std::io::Error::other(
            "toml feature disabled: enable the 'toml' feature to support this file format",
        ),
    ))
}
