//! Loader → aggregator → enricher chain.

use crate::aggregator::{Aggregation, RegionAggregator};
use crate::enricher::{enrich, DEFAULT_TOP_N};
use crate::loader::{LoaderOptions, SheetLoader};
use creditviz_common::{MetricLabels, Record, Result};
use std::path::Path;
use tracing::{info, instrument};

/// Configuration for the summarization pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub loader: LoaderOptions,
    pub labels: MetricLabels,
    /// Countries listed per region; `None` skips enrichment.
    pub top_n: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            loader: LoaderOptions::default(),
            labels: MetricLabels::default(),
            top_n: Some(DEFAULT_TOP_N),
        }
    }
}

/// Runs every data stage once, start to finish.
#[derive(Debug, Clone, Default)]
pub struct SummaryPipeline {
    config: PipelineConfig,
}

impl SummaryPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the workbook and summarize it.
    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<Aggregation> {
        let records = SheetLoader::new(self.config.loader.clone()).load(path)?;
        Ok(self.run(&records))
    }

    /// Aggregate, then enrich when `top_n` is set.
    #[instrument(skip(self, records), fields(records = records.len(), top_n = ?self.config.top_n))]
    pub fn run(&self, records: &[Record]) -> Aggregation {
        let mut aggregation = RegionAggregator::new(self.config.labels.clone()).aggregate(records);

        if let Some(n) = self.config.top_n {
            aggregation.summaries = enrich(aggregation.summaries, records, n);
        }

        info!(
            regions = aggregation.summaries.len(),
            kept = aggregation.kept,
            dropped = aggregation.dropped,
            "Summarized registry"
        );
        aggregation
    }
}
