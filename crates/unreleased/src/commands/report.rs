//! Report command.

use std::fmt::Display;
use std::io::{self, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use clap::Args;
use tracing::info;
use unreleased_config::{OverrideTables, find_and_load_config};
use unreleased_core::{ReportRun, render_footer};

/// Timestamp format of the footer, `date` style with a numeric UTC offset.
const FOOTER_TIME_FORMAT: &str = "%a %b %e %H:%M:%S %z %Y";

/// Arguments for the report command.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Only process plugins and repositories whose name starts with this prefix
    pub prefix: Option<String>,
}

/// Runs the report command.
pub fn run(args: ReportArgs) -> Result<()> {
    let started = Instant::now();
    let config = find_and_load_config().context("failed to load configuration")?;

    let tables = OverrideTables::read_from(&mut io::stdin().lock())
        .context("failed to read override tables from stdin")?;
    info!(
        known_revs = tables.known_revs.len(),
        repo_map = tables.repo_map.len(),
        tag_map = tables.tag_map.len(),
        really_github = tables.really_github.len(),
        "override tables loaded"
    );

    let rt = tokio::runtime::Runtime::new().context("failed to create async runtime")?;
    let today = Local::now().date_naive();
    let report = rt
        .block_on(ReportRun::new(config.clone()).execute(tables, args.prefix.as_deref(), today))
        .context("report run failed")?;

    let mut text = report.render(&config.report);
    text.push_str(&render_footer(
        &footer_timestamp(&Local::now()),
        started.elapsed(),
    ));

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .context("failed to write report")?;
    Ok(())
}

fn footer_timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    now.format(FOOTER_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_footer_timestamp_has_numeric_offset() {
        let now = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2011, 3, 4, 10, 20, 30)
            .unwrap();
        assert_eq!(footer_timestamp(&now), "Fri Mar  4 10:20:30 +0100 2011");
    }

    #[test]
    fn test_footer_timestamp_utc() {
        let now = chrono::Utc.with_ymd_and_hms(2011, 12, 25, 0, 0, 0).unwrap();
        assert_eq!(footer_timestamp(&now), "Sun Dec 25 00:00:00 +0000 2011");
    }
}
