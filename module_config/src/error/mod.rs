//! Error types produced while registering rules and resolving configuration.

mod aggregate;
mod constructors;
mod conversions;
mod types;

pub use aggregate::AggregatedErrors;
pub use types::{BoxError, ConfigError};

#[cfg(test)]
mod tests;
