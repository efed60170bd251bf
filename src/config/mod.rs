//! Configuration loading and validation.

pub mod loader;

pub use loader::{load_config, Config, ConfigError};
