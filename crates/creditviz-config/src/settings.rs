//! Application configuration structures

use creditviz_charts::{
    BarMode, ChartOptions, HoverLabelStyle, RenderFormat, RendererSettings, DEFAULT_PLOTLY_CDN_URL,
};
use creditviz_common::{LoggingConfig, MetricLabels};
use creditviz_data::{ColumnNames, LoaderOptions, PipelineConfig, DEFAULT_TOP_N};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;
use validator::{Validate, ValidationErrors};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workbook location and layout
    pub source: SourceConfig,

    /// Display names of the two metrics
    pub metrics: MetricLabels,

    /// Top-country enrichment
    pub enrichment: EnrichmentConfig,

    /// Chart appearance
    pub chart: ChartConfig,

    /// Rendered files
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Workbook location and layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SourceConfig {
    /// Path of the registry workbook
    #[validate(custom(
        function = "crate::validation::validate_source_path",
        message = "Input workbook path cannot be empty"
    ))]
    pub path: PathBuf,

    /// Sheet holding the project table
    #[validate(length(min = 1, message = "Sheet name cannot be empty"))]
    pub sheet: String,

    /// Metadata rows above the header row
    pub skip_rows: usize,

    /// Number of leading columns read from each row
    #[validate(range(min = 1, message = "Column limit must be at least 1"))]
    pub column_limit: usize,

    /// Header names of the consumed columns
    pub columns: ColumnNames,
}

/// Top-country enrichment settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Whether to rank countries and add hover text
    pub enabled: bool,

    /// Countries listed per region
    #[validate(range(max = 100, message = "At most 100 countries can be listed per region"))]
    pub top_n: usize,
}

/// Chart appearance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChartConfig {
    /// Chart title
    pub title: String,

    /// X axis title
    pub x_axis_title: String,

    /// Y axis title
    pub y_axis_title: String,

    /// Metric label to bar color (hex format)
    #[validate(custom(
        function = "crate::validation::validate_color_map",
        message = "Colors must be valid hex colors keyed by metric label"
    ))]
    pub colors: BTreeMap<String, String>,

    /// Bar layout
    pub bar_mode: BarMode,

    /// Tooltip styling
    pub hover_label: HoverLabelStyle,

    /// Chart width in pixels
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,

    /// Chart height in pixels
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,

    /// Font family for static renderings
    #[validate(length(min = 1, message = "Font family cannot be empty"))]
    pub font_family: String,
}

/// Rendered file settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving rendered charts
    pub directory: PathBuf,

    /// File name without extension
    #[validate(custom(
        function = "crate::validation::validate_file_stem",
        message = "File stem must be a plain, non-empty file name"
    ))]
    pub file_stem: String,

    /// Formats rendered by default
    #[validate(length(min = 1, message = "At least one output format is required"))]
    pub formats: Vec<RenderFormat>,

    /// plotly.js bundle loaded by HTML output
    #[validate(length(min = 1, message = "plotly.js URL cannot be empty"))]
    pub plotly_cdn_url: String,
}

impl Config {
    /// Comprehensive validation of the entire configuration
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.source.validate()?;
        self.enrichment.validate()?;
        self.chart.validate()?;
        self.chart.validate_hover_label()?;
        self.output.validate()?;
        self.validate_metrics()?;

        for label in self.chart.colors.keys() {
            if self.metrics.metric_for(label).is_none() {
                warn!(label = %label, "Color configured for unknown metric label");
            }
        }

        Ok(())
    }

    /// Metric labels must be non-empty and distinct
    pub fn validate_metrics(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.metrics.issued.trim().is_empty() {
            errors.add("issued", validator::ValidationError::new("empty_metric_label"));
        }
        if self.metrics.remaining.trim().is_empty() {
            errors.add("remaining", validator::ValidationError::new("empty_metric_label"));
        }
        if self.metrics.issued == self.metrics.remaining {
            errors.add("remaining", validator::ValidationError::new("duplicate_metric_label"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Options for the data pipeline
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            loader: self.source.loader_options(),
            labels: self.metrics.clone(),
            top_n: self.enrichment.enabled.then_some(self.enrichment.top_n),
        }
    }

    /// Options for the chart builder
    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            title: self.chart.title.clone(),
            x_axis_title: self.chart.x_axis_title.clone(),
            y_axis_title: self.chart.y_axis_title.clone(),
            colors: self.chart.colors.clone(),
            bar_mode: self.chart.bar_mode,
            hover_label: self.chart.hover_label.clone(),
            width: self.chart.width,
            height: self.chart.height,
        }
    }

    /// Settings shared by the renderers
    pub fn renderer_settings(&self) -> RendererSettings {
        RendererSettings {
            plotly_cdn_url: self.output.plotly_cdn_url.clone(),
            font_family: self.chart.font_family.clone(),
        }
    }
}

impl SourceConfig {
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            sheet: self.sheet.clone(),
            skip_rows: self.skip_rows,
            column_limit: self.column_limit,
            columns: self.columns.clone(),
        }
    }
}

impl ChartConfig {
    pub fn validate_hover_label(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let style = &self.hover_label;

        if let Err(err) = crate::validation::validate_hex_color(&style.background_color) {
            errors.add("hover_label.background_color", err);
        }
        if let Err(err) = crate::validation::validate_hex_color(&style.font_color) {
            errors.add("hover_label.font_color", err);
        }
        if !(6..=72).contains(&style.font_size) {
            errors.add(
                "hover_label.font_size",
                validator::ValidationError::new("font_size_out_of_range"),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        let loader = LoaderOptions::default();
        Self {
            path: PathBuf::new(),
            sheet: loader.sheet,
            skip_rows: loader.skip_rows,
            column_limit: loader.column_limit,
            columns: loader.columns,
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        let options = ChartOptions::default();
        Self {
            title: options.title,
            x_axis_title: options.x_axis_title,
            y_axis_title: options.y_axis_title,
            colors: options.colors,
            bar_mode: options.bar_mode,
            hover_label: options.hover_label,
            width: options.width,
            height: options.height,
            font_family: RendererSettings::default().font_family,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            file_stem: "credits_by_region".to_string(),
            formats: vec![RenderFormat::Html],
            plotly_cdn_url: DEFAULT_PLOTLY_CDN_URL.to_string(),
        }
    }
}
