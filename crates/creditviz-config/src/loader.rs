//! Configuration loading utilities

use crate::Config;
use creditviz_charts::RenderFormat;
use creditviz_common::CreditVizError;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Environment variable naming the configuration file
pub const CONFIG_PATH_VAR: &str = "CREDITVIZ_CONFIG";

/// File names tried in the working directory when no path is given
pub const DEFAULT_CONFIG_FILES: [&str; 3] = ["creditviz.toml", "creditviz.yaml", "creditviz.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File extension is neither TOML nor YAML
    #[error("Unsupported configuration file '{}' (expected .toml, .yaml or .yml)", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParse {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl From<ConfigError> for CreditVizError {
    fn from(err: ConfigError) -> Self {
        CreditVizError::config_with_source(err.to_string(), err)
    }
}

/// Syntax of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Format implied by the file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Parse configuration text without overrides or validation
    pub fn parse_str(content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
        let config: Config = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        };
        Ok(config)
    }

    /// Read and parse a configuration file
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content, format)
    }

    /// Load configuration from a file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_with(Some(path.as_ref()), |_| {})
    }

    /// Load a file (or defaults), apply environment overrides, then the
    /// caller's overrides, then validate.
    #[instrument(skip(overrides))]
    pub fn load_with(
        path: Option<&Path>,
        overrides: impl FnOnce(&mut Config),
    ) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::read_file(path)?
            }
            None => {
                debug!("No configuration file, using defaults");
                Config::default()
            }
        };

        Self::apply_env_overrides(&mut config)?;
        overrides(&mut config);
        config.validate_all()?;

        Ok(config)
    }

    /// Configuration file to use when none was named explicitly
    pub fn discover() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_VAR) {
            return Some(PathBuf::from(path));
        }
        DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.exists())
    }

    /// Apply `CREDITVIZ_*` environment variable overrides
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides(config, |var| env::var(var).ok())
    }

    /// Apply overrides from any variable source
    pub fn apply_overrides(
        config: &mut Config,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(input) = lookup("CREDITVIZ_INPUT") {
            config.source.path = PathBuf::from(input);
        }

        if let Some(sheet) = lookup("CREDITVIZ_SHEET") {
            config.source.sheet = sheet;
        }

        if let Some(directory) = lookup("CREDITVIZ_OUTPUT_DIR") {
            config.output.directory = PathBuf::from(directory);
        }

        if let Some(formats) = lookup("CREDITVIZ_FORMATS") {
            config.output.formats = formats
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(RenderFormat::from_str)
                .collect::<Result<_, _>>()
                .map_err(|e| ConfigError::EnvParse {
                    var: "CREDITVIZ_FORMATS".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Some(top_n) = lookup("CREDITVIZ_TOP_N") {
            config.enrichment.top_n = top_n.trim().parse().map_err(|e| ConfigError::EnvParse {
                var: "CREDITVIZ_TOP_N".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Some(level) = lookup("CREDITVIZ_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(format) = lookup("CREDITVIZ_LOG_FORMAT") {
            config.logging.format = format.parse().map_err(|e| ConfigError::EnvParse {
                var: "CREDITVIZ_LOG_FORMAT".to_string(),
                source: Box::new(e),
            })?;
        }

        Ok(())
    }
}
