//! CLI definitions.

use anyhow::Result;
use clap::Parser;

use crate::commands;

/// Report unreleased changes in plugin repositories.
///
/// Override tables are read from stdin; the report is written to stdout.
#[derive(Debug, Parser)]
#[command(name = "unreleased")]
#[command(version, about, long_about = None)]
pub struct ReportCli {
    #[command(flatten)]
    pub args: commands::report::ReportArgs,
}

impl ReportCli {
    /// Runs the report.
    pub fn run(self) -> Result<()> {
        commands::report::run(self.args)
    }
}

/// Publish a report read from stdin to the wiki.
#[derive(Debug, Parser)]
#[command(name = "unreleased-publish")]
#[command(version, about, long_about = None)]
pub struct PublishCli {}

impl PublishCli {
    /// Runs the upload.
    pub fn run(self) -> Result<()> {
        commands::publish::run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_optional() {
        let cli = ReportCli::try_parse_from(["unreleased"]).unwrap();
        assert!(cli.args.prefix.is_none());

        let cli = ReportCli::try_parse_from(["unreleased", "git"]).unwrap();
        assert_eq!(cli.args.prefix.as_deref(), Some("git"));
    }

    #[test]
    fn test_rejects_flags_and_extra_arguments() {
        assert!(ReportCli::try_parse_from(["unreleased", "--verbose"]).is_err());
        assert!(ReportCli::try_parse_from(["unreleased", "a", "b"]).is_err());
        assert!(PublishCli::try_parse_from(["unreleased-publish", "x"]).is_err());
    }
}
