//! # creditviz config
//!
//! Loads the TOML or YAML configuration file, applies `CREDITVIZ_*`
//! environment overrides and validates the result before any stage runs.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigFormat, ConfigLoader, CONFIG_PATH_VAR, DEFAULT_CONFIG_FILES};
pub use settings::{ChartConfig, Config, EnrichmentConfig, OutputConfig, SourceConfig};
