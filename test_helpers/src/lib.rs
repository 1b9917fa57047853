//! Test helpers shared across crates.
//!
//! Provides scripted stand-ins for the asynchronous collaborators of
//! `module_config::ConfigService` that record how they were called.

pub mod loader;
pub mod provider;

pub use loader::RecordingLoader;
pub use provider::ScriptedProvider;
