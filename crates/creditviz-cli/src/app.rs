//! Subcommand implementations

use crate::cli::{Cli, Command, SourceArgs};
use anyhow::{Context, Result};
use creditviz_charts::{renderer_for, ChartBuilder, RenderFormat};
use creditviz_common::init_logging;
use creditviz_config::{Config, ConfigLoader};
use creditviz_data::{Aggregation, SummaryPipeline};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Run a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render(args) => {
            let config = load_config(&args.source, |config| args.apply(config))?;
            start_logging(&config, cli.log_level)?;
            for path in render(&config)? {
                println!("{}", path.display());
            }
        }
        Command::Summary(args) => {
            let config = load_config(&args.source, |config| args.apply(config))?;
            start_logging(&config, cli.log_level)?;
            println!("{}", summary_json(&config)?);
        }
    }
    Ok(())
}

/// Configuration file (explicit or discovered), environment, then arguments.
pub fn load_config(source: &SourceArgs, apply: impl FnOnce(&mut Config)) -> Result<Config> {
    let path = source.config.clone().or_else(ConfigLoader::discover);
    ConfigLoader::load_with(path.as_deref(), apply).with_context(|| match &path {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Invalid configuration".to_string(),
    })
}

fn start_logging(config: &Config, level: Option<String>) -> Result<()> {
    let mut logging = config.logging.clone();
    if let Some(level) = level {
        logging.level = level;
    }
    init_logging(&logging).context("Failed to initialize logging")
}

/// Load and summarize the configured workbook.
pub fn summarize(config: &Config) -> Result<Aggregation> {
    let path = &config.source.path;
    let aggregation = SummaryPipeline::new(config.pipeline_config())
        .run_file(path)
        .map_err(|err| {
            let message = if err.is_loader_error() {
                format!("Failed to read registry workbook {}", path.display())
            } else {
                format!("Failed to summarize {}", path.display())
            };
            anyhow::Error::new(err).context(message)
        })?;

    if aggregation.summaries.is_empty() {
        warn!("No complete records, the chart will be empty");
    }
    Ok(aggregation)
}

/// Render every configured format. Returns the written paths.
#[instrument(skip(config), fields(input = %config.source.path.display()))]
pub fn render(config: &Config) -> Result<Vec<PathBuf>> {
    let aggregation = summarize(config)?;
    let spec = ChartBuilder::new(config.chart_options())
        .from_summaries(&aggregation.summaries, &config.metrics);

    let settings = config.renderer_settings();
    let mut formats: Vec<RenderFormat> = Vec::new();
    for format in &config.output.formats {
        if !formats.contains(format) {
            formats.push(*format);
        }
    }

    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let renderer = renderer_for(format, &settings);
        let path = renderer.output_path(&config.output.directory, &config.output.file_stem);
        renderer
            .render_to_file(&spec, &path)
            .with_context(|| format!("Failed to render {} chart to {}", renderer.name(), path.display()))?;
        written.push(path);
    }

    info!(files = written.len(), "Rendered charts");
    Ok(written)
}

/// Summary rows as pretty JSON.
pub fn summary_json(config: &Config) -> Result<String> {
    let aggregation = summarize(config)?;
    serde_json::to_string_pretty(&aggregation.summaries).context("Failed to serialize summaries")
}
