//! Mutable state of one report run.

use std::collections::HashSet;

use tracing::debug;
use unreleased_config::{OverrideTables, OverrideValue};

use crate::feed::SKIP;

/// Label of a repository that was never released.
pub(crate) const UNRELEASED: &str = "unreleased";

/// Override tables and membership sets threaded through a run.
///
/// Known-revision entries are drained as they match; whatever is left at the
/// end is reported as unused.
#[derive(Debug, Default)]
pub struct RunContext {
    /// Operator tables, partially drained during the run.
    pub tables: OverrideTables,
    prefix: Option<String>,
    seen_github: HashSet<String>,
    seen_svn: HashSet<String>,
}

impl RunContext {
    /// Creates a context, optionally limited to names starting with `prefix`.
    #[must_use]
    pub fn new(tables: OverrideTables, prefix: Option<&str>) -> Self {
        Self {
            tables,
            prefix: prefix.filter(|p| !p.is_empty()).map(String::from),
            seen_github: HashSet::new(),
            seen_svn: HashSet::new(),
        }
    }

    /// Returns whether a plugin or repository passes the prefix filter.
    #[must_use]
    pub fn matches_prefix(&self, name: &str) -> bool {
        self.prefix
            .as_deref()
            .is_none_or(|prefix| name.starts_with(prefix))
    }

    /// Returns whether the repository remap says `skip` for a name.
    #[must_use]
    pub fn is_skipped(&self, name: &str) -> bool {
        self.tables.repo_map.text(name) == Some(SKIP)
    }

    /// Marks every skipped name's `-plugin` mirror as skipped too.
    pub fn propagate_skips(&mut self) {
        let mirrors: Vec<String> = self
            .tables
            .repo_map
            .iter()
            .filter(|(_, value)| value.as_str() == SKIP)
            .map(|(key, _)| format!("{key}-plugin"))
            .collect();
        for mirror in mirrors {
            debug!(repository = %mirror, "skipping mirror");
            self.tables
                .repo_map
                .insert(mirror, OverrideValue::Text(SKIP.to_string()));
        }
    }

    /// Records a GitHub repository as covered by a release.
    pub fn mark_github(&mut self, repository: impl Into<String>) {
        self.seen_github.insert(repository.into());
    }

    /// Records an svn trunk directory as covered by a release.
    pub fn mark_svn(&mut self, directory: impl Into<String>) {
        self.seen_svn.insert(directory.into());
    }

    /// Returns whether a GitHub repository was covered.
    #[must_use]
    pub fn seen_github(&self, repository: &str) -> bool {
        self.seen_github.contains(repository)
    }

    /// Returns whether an svn directory was covered.
    #[must_use]
    pub fn seen_svn(&self, directory: &str) -> bool {
        self.seen_svn.contains(directory)
    }

    /// Returns the label of a never-released repository, consuming `<name>-unreleased`.
    pub fn unreleased_label(&mut self, name: &str) -> String {
        match self.tables.known_revs.take(&format!("{name}-{UNRELEASED}")) {
            Some(OverrideValue::Text(text)) if !text.is_empty() => text,
            _ => UNRELEASED.to_string(),
        }
    }

    /// Returns the known-revision entries never consumed, filtered by prefix.
    #[must_use]
    pub fn unused(&self) -> Vec<(String, String)> {
        self.tables
            .known_revs
            .iter()
            .filter(|(key, _)| self.matches_prefix(key))
            .map(|(key, value)| (key.to_string(), value.as_str().to_string()))
            .collect()
    }
}
