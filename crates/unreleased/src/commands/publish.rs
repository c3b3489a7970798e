//! Publish command.

use std::io::{self, Read};

use anyhow::{Context, Result};
use unreleased_config::find_and_load_config;
use unreleased_wiki::ConfluenceClient;

/// Reads the report from stdin and stores it as the configured wiki page.
pub fn run() -> Result<()> {
    let config = find_and_load_config().context("failed to load configuration")?;

    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("failed to read report from stdin")?;

    let client = ConfluenceClient::new(config.wiki.rpc_url.as_str())
        .context("failed to create wiki client")?;
    let rt = tokio::runtime::Runtime::new().context("failed to create async runtime")?;
    rt.block_on(client.publish(&config.wiki, &content))
        .with_context(|| format!("failed to publish page '{}'", config.wiki.page))
}
