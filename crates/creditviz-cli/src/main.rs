//! Main entry point for creditviz.

use anyhow::Result;
use clap::Parser;
use creditviz_cli::{run, Cli};

fn main() -> Result<()> {
    run(Cli::parse())
}
