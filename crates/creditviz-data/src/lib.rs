//! # creditviz data
//!
//! The data half of the pipeline: read the registry workbook, filter and
//! sum credits by region, reshape to long format and rank the top
//! contributing countries of each region.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod enricher;
pub mod loader;
pub mod pipeline;

pub use aggregator::{complete_records, pivot, summarize_by_region, unpivot, Aggregation, RegionAggregator};
pub use enricher::{attach_top_countries, enrich, top_contributors, TopContributors, DEFAULT_TOP_N};
pub use loader::{read_sheet_rows, records_from_rows, Cell, ColumnNames, LoaderOptions, SheetLoader};
pub use pipeline::{PipelineConfig, SummaryPipeline};
