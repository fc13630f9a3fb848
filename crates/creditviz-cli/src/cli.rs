//! Command line arguments

use clap::{Args, Parser, Subcommand};
use creditviz_charts::RenderFormat;
use creditviz_common::CreditVizError;
use creditviz_config::Config;
use std::path::PathBuf;

/// Summarize a credit registry workbook by region and chart it
#[derive(Parser, Debug)]
#[command(name = "creditviz", author, version, about, long_about = None)]
pub struct Cli {
    /// Log level filter, overrides the configuration file
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the grouped bar chart
    Render(RenderArgs),
    /// Print the regional summary table as JSON
    Summary(SummaryArgs),
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Configuration file (TOML or YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Registry workbook
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Sheet holding the project table
    #[arg(short, long)]
    pub sheet: Option<String>,
}

impl SourceArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.source.path = input.clone();
        }
        if let Some(sheet) = &self.sheet {
            config.source.sheet = sheet.clone();
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format; repeat or separate with commas
    #[arg(short, long = "format", value_delimiter = ',', value_parser = parse_format)]
    pub formats: Vec<RenderFormat>,

    /// Directory receiving the rendered files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Skip the top-country ranking and hover text
    #[arg(long)]
    pub no_enrich: bool,
}

impl RenderArgs {
    pub fn apply(&self, config: &mut Config) {
        self.source.apply(config);
        if !self.formats.is_empty() {
            config.output.formats = self.formats.clone();
        }
        if let Some(directory) = &self.output_dir {
            config.output.directory = directory.clone();
        }
        if self.no_enrich {
            config.enrichment.enabled = false;
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Countries listed per region
    #[arg(short = 'n', long)]
    pub top: Option<usize>,
}

impl SummaryArgs {
    pub fn apply(&self, config: &mut Config) {
        self.source.apply(config);
        if let Some(top) = self.top {
            config.enrichment.enabled = true;
            config.enrichment.top_n = top;
        }
    }
}

fn parse_format(value: &str) -> Result<RenderFormat, CreditVizError> {
    value.parse()
}
