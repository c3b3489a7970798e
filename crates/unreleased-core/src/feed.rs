//! Plugin metadata feed.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::warn;
use unreleased_config::OverrideTables;

use crate::CoreResult;

/// Characters trimmed from both ends of a JSONP-wrapped feed.
const JSONP_WRAPPER: &str = "updateCnr.os(); \t\n\r";

/// Remap value that suppresses a plugin or repository.
pub(crate) const SKIP: &str = "skip";

/// The update-center document.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCenter {
    /// Plugins keyed by identifier, in identifier order.
    pub plugins: BTreeMap<String, FeedPlugin>,
}

/// One plugin entry of the feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPlugin {
    /// Declared (released) version.
    pub version: String,
    /// Wiki page.
    #[serde(default)]
    pub wiki: Option<String>,
    /// Timestamp of the release, as published.
    #[serde(default)]
    pub release_timestamp: Option<String>,
    /// Source-control host, e.g. `github.com`.
    #[serde(default)]
    pub scm: Option<String>,
}

/// Parses the feed, accepting both plain JSON and the JSONP form.
///
/// # Errors
///
/// Returns an error if the body is not a valid update-center document.
pub fn parse_feed(body: &str) -> CoreResult<UpdateCenter> {
    let json = body.trim_matches(|c| JSONP_WRAPPER.contains(c));
    Ok(serde_json::from_str(json)?)
}

/// Which backend hosts a plugin's sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScmKind {
    /// GitHub.
    HostedGit,
    /// The legacy svn repository.
    LegacySvn,
}

/// A released plugin, as processed during one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRecord {
    /// Plugin identifier.
    pub id: String,
    /// Declared version from the feed.
    pub version: String,
    /// Wiki page, if any.
    pub wiki: Option<String>,
    /// Release timestamp, if any.
    pub release_timestamp: Option<String>,
    /// Backend hosting the sources.
    pub scm: ScmKind,
    /// Repository name (GitHub) or trunk directory (svn).
    pub repository: String,
}

impl PluginRecord {
    /// Builds a record from a feed entry and the operator tables.
    ///
    /// Returns `None` if the repository remap says `skip`.
    #[must_use]
    pub fn from_feed(id: &str, entry: &FeedPlugin, tables: &OverrideTables) -> Option<Self> {
        let hosted = entry
            .scm
            .as_deref()
            .is_some_and(|scm| scm.to_ascii_lowercase().ends_with("github.com"));
        if entry.scm.is_none() {
            warn!(plugin = %id, "missing scm info");
        }
        let scm = if hosted || tables.really_github.contains(id) {
            ScmKind::HostedGit
        } else {
            ScmKind::LegacySvn
        };

        let repository = match tables.repo_map.text(id) {
            Some(repo) => repo.to_string(),
            None if scm == ScmKind::HostedGit && !id.ends_with("-plugin") => format!("{id}-plugin"),
            None => id.to_string(),
        };
        if repository == SKIP {
            return None;
        }

        Some(Self {
            id: id.to_string(),
            version: entry.version.clone(),
            wiki: entry.wiki.clone(),
            release_timestamp: entry.release_timestamp.clone(),
            scm,
            repository,
        })
    }
}
