//! Extensions for mapping errors to `ConfigResult` concisely.
//!
//! These helpers replace repetitive `.map_err(|e| Arc::new(e.into()))` calls
//! when converting external error types into the crate's
//! `ConfigResult<T>` alias (`Result<T, Arc<ConfigError>>`).
//!
//! # Examples
//!
//! ```
//! use module_config::{ConfigResult, ConfigResultExt};
//!
//! fn gather() -> ConfigResult<String> {
//!     // figment::Error implements Into<ConfigError>
//!     figment::Figment::new().extract_inner::<String>("missing").into_config()
//! }
//! assert!(gather().is_err());
//! ```

use crate::{ConfigError, ConfigResult};
use std::sync::Arc;

/// Generic extension for mapping any `Result<T, E>` with
/// `E: Into<ConfigError>` into a `ConfigResult<T>`.
pub trait ConfigResultExt<T, E> {
    /// Convert `Result<T, E>` into `ConfigResult<T>` using `Into<ConfigError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<ConfigError>`.
    fn into_config(self) -> ConfigResult<T>;
}

impl<T, E> ConfigResultExt<T, E> for Result<T, E>
where
    E: Into<ConfigError>,
{
    fn into_config(self) -> ConfigResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}
