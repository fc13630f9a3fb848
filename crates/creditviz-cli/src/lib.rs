//! # creditviz
//!
//! Command line front end: loads configuration, runs the data pipeline and
//! writes charts or the summary table.

#![warn(clippy::all)]

pub mod app;
pub mod cli;

pub use app::{load_config, render, run, summarize, summary_json};
pub use cli::{Cli, Command, RenderArgs, SourceArgs, SummaryArgs};
