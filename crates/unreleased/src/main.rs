//! Unreleased CLI - Report unreleased plugin changes.

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    unreleased::init_logging();

    let cli = unreleased::ReportCli::parse();
    cli.run()
}
