//! Command-line front ends for Unreleased.
//!
//! Two binaries share this crate:
//! - `unreleased` builds the report and prints it on stdout
//! - `unreleased-publish` pushes a report read from stdin to the wiki

mod cli;
mod commands;

use tracing_subscriber::EnvFilter;

pub use cli::{PublishCli, ReportCli};

/// Installs the log subscriber.
///
/// Logs go to stderr so stdout carries only the report.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
