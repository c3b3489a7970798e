//! svn access through the `svn` command line client.

use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};
use unreleased_history::Revision;

use crate::{ScmError, ScmResult};

/// A tag directory and the revision it was created in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvnTag {
    /// Directory name, e.g. `foo-1.2`.
    pub name: String,
    /// Revision of the last commit to the tag directory.
    pub revision: u64,
}

#[derive(Debug, Deserialize)]
struct Lists {
    #[serde(rename = "list", default)]
    lists: Vec<List>,
}

#[derive(Debug, Deserialize)]
struct List {
    #[serde(rename = "entry", default)]
    entries: Vec<ListEntry>,
}

#[derive(Debug, Deserialize)]
struct ListEntry {
    name: String,
    commit: ListCommit,
}

#[derive(Debug, Deserialize)]
struct ListCommit {
    #[serde(rename = "@revision")]
    revision: u64,
}

#[derive(Debug, Deserialize)]
struct Log {
    #[serde(rename = "logentry", default)]
    entries: Vec<LogEntry>,
}

#[derive(Debug, Deserialize)]
struct LogEntry {
    #[serde(default)]
    date: String,
    #[serde(default)]
    msg: Option<String>,
}

/// Parses `svn ls --xml` output for one or more directories.
///
/// # Errors
///
/// Returns an error if the document is not an svn listing.
pub fn parse_tag_list(xml: &str) -> ScmResult<Vec<SvnTag>> {
    let lists: Lists = quick_xml::de::from_str(xml)?;
    Ok(lists
        .lists
        .into_iter()
        .flat_map(|list| list.entries)
        .map(|entry| SvnTag {
            name: entry.name,
            revision: entry.commit.revision,
        })
        .collect())
}

/// Parses `svn log --xml` output into revisions, in document order.
///
/// Missing messages become empty; entries without a readable date are skipped.
///
/// # Errors
///
/// Returns an error if the document is not an svn log.
pub fn parse_log(xml: &str) -> ScmResult<Vec<Revision>> {
    let log: Log = quick_xml::de::from_str(xml)?;
    let mut revisions = Vec::with_capacity(log.entries.len());
    for entry in log.entries {
        match Revision::from_day_prefix(&entry.date, entry.msg.unwrap_or_default()) {
            Some(revision) => revisions.push(revision),
            None => warn!(date = %entry.date, "skipping log entry with unreadable date"),
        }
    }
    Ok(revisions)
}

/// Returns the directory names (entries ending in `/`) of a plain `svn ls`.
pub fn parse_dir_listing(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim_end)
        .filter_map(|line| line.strip_suffix('/'))
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Thin wrapper over the `svn` executable.
#[derive(Debug, Clone)]
pub struct SvnClient {
    command: String,
}

impl SvnClient {
    /// Creates a client running the given executable.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> ScmResult<String> {
        debug!(command = %self.command, ?args, "running svn");
        let output = Command::new(&self.command)
            .arg("--non-interactive")
            .args(args)
            .output()
            .await?;

        if !output.status.success() {
            return Err(ScmError::Command {
                command: format!("{} {}", self.command, args.join(" ")),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Lists every tag directory under the given URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if `svn` fails or prints something unexpected.
    pub async fn list_tags(&self, urls: &[String]) -> ScmResult<Vec<SvnTag>> {
        let mut args = vec!["ls", "--xml"];
        args.extend(urls.iter().map(String::as_str));
        parse_tag_list(&self.run(&args).await?)
    }

    /// Lists the subdirectories of a URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `svn` fails.
    pub async fn list_dirs(&self, url: &str) -> ScmResult<Vec<String>> {
        Ok(parse_dir_listing(&self.run(&["ls", url]).await?))
    }

    /// Returns the log of `url` from `revision` up to `HEAD`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if `svn` fails or prints something unexpected.
    pub async fn log_since(&self, url: &str, revision: u64) -> ScmResult<Vec<Revision>> {
        let range = format!("{revision}:HEAD");
        parse_log(&self.run(&["log", "-r", &range, "--xml", url]).await?)
    }
}
