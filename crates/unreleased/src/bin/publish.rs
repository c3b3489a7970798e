//! Publishes a generated report to the wiki.

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    unreleased::init_logging();

    let cli = unreleased::PublishCli::parse();
    cli.run()
}
