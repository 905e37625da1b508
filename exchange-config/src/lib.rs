//! Configuration for the channel exchange
//!
//! This crate describes where the exchange files live (the [`FileLayout`]) and
//! how the tooling around them logs, with YAML loading, validation and
//! environment variable overrides.

pub mod error;
pub mod loader;
pub mod validation;

pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

pub use domains::{
    files::{FileLayout, Resource},
    logging::{LogFormat, LogLevel, LoggingConfig},
    ExchangeConfig,
};
