//! Error types and utilities for creditviz

use thiserror::Error;

/// Result type alias for creditviz operations
pub type Result<T> = std::result::Result<T, CreditVizError>;

/// Main error type for creditviz operations
#[derive(Error, Debug)]
pub enum CreditVizError {
    /// The input workbook could not be opened or is not a spreadsheet
    #[error("Source not found: {path}")]
    SourceNotFound {
        path: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The requested sheet does not exist in the workbook
    #[error("Sheet '{sheet}' not found (available: {})", .available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    /// Expected columns are missing from the header row
    #[error("Schema mismatch: missing column(s) {}", .missing.join(", "))]
    SchemaMismatch {
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Chart construction and rendering errors
    #[error("Chart error: {message}")]
    Chart {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for user input or data
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },
}

impl CreditVizError {
    /// Create a source-not-found error for a path
    pub fn source_not_found(path: impl Into<String>) -> Self {
        Self::SourceNotFound {
            path: path.into(),
            source: None,
        }
    }

    /// Create a source-not-found error carrying the underlying reader error
    pub fn source_not_found_with_source(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::SourceNotFound {
            path: path.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a sheet-not-found error
    pub fn sheet_not_found(sheet: impl Into<String>, available: Vec<String>) -> Self {
        Self::SheetNotFound {
            sheet: sheet.into(),
            available,
        }
    }

    /// Create a schema mismatch error
    pub fn schema_mismatch(missing: Vec<String>, found: Vec<String>) -> Self {
        Self::SchemaMismatch { missing, found }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new chart error
    pub fn chart(msg: impl Into<String>) -> Self {
        Self::Chart {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new chart error with source
    pub fn chart_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Chart {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether this error was raised while loading the input workbook
    pub fn is_loader_error(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound { .. } | Self::SheetNotFound { .. } | Self::SchemaMismatch { .. }
        )
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to CreditVizError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for CreditVizError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::chart_with_source("Chart rendering failed", err)
    }
}
