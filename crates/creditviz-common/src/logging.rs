//! Structured logging infrastructure for creditviz

use crate::{CreditVizError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, colored output for interactive use
    Pretty,
    /// One line per event
    Compact,
    /// Newline-delimited JSON objects
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

impl FromStr for LogFormat {
    type Err = CreditVizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(CreditVizError::validation_field(
                format!("unknown log format '{other}'"),
                "logging.format",
            )),
        }
    }
}

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "creditviz_data=trace")
    pub level: String,
    /// Line format
    pub format: LogFormat,
    /// Optional file path for log output; stderr when absent
    pub file_path: Option<PathBuf>,
    /// Whether to log span open/close events
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

/// Build the level filter. `RUST_LOG` wins over the configured level.
fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| CreditVizError::config_with_source("Invalid log filter", e))
}

fn build_writer(config: &LoggingConfig) -> Result<BoxMakeWriter> {
    let Some(path) = &config.file_path else {
        return Ok(BoxMakeWriter::new(io::stderr));
    };

    let file_name = path.file_name().ok_or_else(|| {
        CreditVizError::validation_field(
            format!("log file path '{}' has no file name", path.display()),
            "logging.file_path",
        )
    })?;
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&directory)?;

    Ok(BoxMakeWriter::new(tracing_appender::rolling::never(
        directory, file_name,
    )))
}

/// Initialize the tracing subscriber with the given configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_filter(&config.level)?;
    let writer = build_writer(config)?;

    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let base = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_span_events(span_events)
        .with_target(config.include_targets)
        .with_ansi(config.file_path.is_none() && config.format == LogFormat::Pretty);

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Compact => base.compact().boxed(),
        LogFormat::Json => base.json().boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| CreditVizError::config_with_source("Logging already initialized", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.file_path.is_none());
        assert!(!config.include_spans);
        assert!(config.include_targets);
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!(" JSON ".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: LoggingConfig = serde_json::from_str(r#"{"format": "json"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_writer_rejects_path_without_file_name() {
        let config = LoggingConfig {
            file_path: Some(PathBuf::from("/")),
            ..LoggingConfig::default()
        };
        assert!(build_writer(&config).is_err());
    }
}
