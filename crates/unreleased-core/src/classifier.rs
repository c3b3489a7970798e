//! Change classification.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::warn;
use unreleased_config::{IssuesConfig, OverrideTable, OverrideValue};
use unreleased_history::Revision;

/// Commit message of a community translation drop.
static LOCALIZATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(integrated )?community[- ]contributed (localization|translation)")
        .expect("invalid regex")
});

/// Issue reference such as `FIXED JENKINS-123` or `fixes HUDSON-4`.
static FIXED_ISSUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)FIX[EDS]* [A-Z]+-(\d+)").expect("invalid regex"));

/// Substring marking the release plugin's post-release commit.
const NEXT_ITERATION: &str = "prepare for next development";

/// Prefix of the legacy release tooling's version bump commit.
const POM_BUMP: &str = "bumping up POM version";

/// Label of a plugin without changes since its release.
pub(crate) const CURRENT: &str = "CURRENT";

/// Returns whether a commit was made by release tooling and carries no change.
#[must_use]
pub fn is_release_noise(message: &str) -> bool {
    message.contains(NEXT_ITERATION) || message.starts_with(POM_BUMP)
}

/// Returns whether a commit only brings in community translations.
#[must_use]
pub fn is_localization(message: &str) -> bool {
    LOCALIZATION.is_match(message)
}

/// Outcome of classifying one plugin's revisions since its release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Revisions counted (release tooling commits excluded).
    pub count: usize,
    /// Formatted links to fixed issues, in message order, duplicates kept.
    pub fixed: Vec<String>,
    /// Counted revisions that were translation drops.
    pub localized: usize,
    /// Date of the first counted revision, in retrieval order.
    pub first_date: Option<NaiveDate>,
    /// Date of the last counted revision, in retrieval order.
    pub last_date: Option<NaiveDate>,
    /// Final label.
    pub label: String,
}

impl Classification {
    /// Returns whether every counted revision was a translation drop.
    #[must_use]
    pub fn localization_only(&self) -> bool {
        self.count > 0 && self.localized == self.count
    }
}

/// Labels the revisions made since a release.
#[derive(Debug, Clone)]
pub struct ChangeClassifier {
    issue_url: String,
    issue_project: String,
}

impl ChangeClassifier {
    /// Creates a classifier linking issues into the given tracker.
    #[must_use]
    pub fn new(issues: &IssuesConfig) -> Self {
        Self {
            issue_url: issues.url.trim_end_matches('/').to_string(),
            issue_project: issues.project.clone(),
        }
    }

    /// Returns a wiki link for every fixed issue referenced by a message.
    pub fn issue_links(&self, message: &str) -> Vec<String> {
        FIXED_ISSUE
            .captures_iter(message)
            .filter_map(|caps| caps.get(1))
            .map(|number| {
                let number = number.as_str();
                format!(
                    "[{number}|{}/{}-{number}]",
                    self.issue_url, self.issue_project
                )
            })
            .collect()
    }

    /// Classifies the revisions of one plugin.
    ///
    /// `known_revs` is consulted with the key `<id>-<resolved>-<count>`; a
    /// matching entry supplies the label and is consumed.
    pub fn classify(
        &self,
        plugin_id: &str,
        declared: &str,
        resolved: &str,
        revisions: &[Revision],
        known_revs: &mut OverrideTable,
    ) -> Classification {
        let mut count = 0;
        let mut localized = 0;
        let mut fixed = Vec::new();
        let mut first_date = None;
        let mut last_date = None;

        for revision in revisions
            .iter()
            .filter(|revision| !is_release_noise(&revision.message))
        {
            count += 1;
            first_date.get_or_insert(revision.date);
            last_date = Some(revision.date);
            if is_localization(&revision.message) {
                localized += 1;
            }
            fixed.extend(self.issue_links(&revision.message));
        }

        let key = format!("{plugin_id}-{resolved}-{count}");
        let mut label = if let Some(known) = known_revs.take(&key) {
            if known == OverrideValue::Marker {
                warn!(plugin = %plugin_id, %key, "known revision entry has no label");
            }
            known.as_str().to_string()
        } else if count == 0 {
            CURRENT.to_string()
        } else {
            let mut label = if !fixed.is_empty() {
                format!("Fixed: {}", fixed.join(" "))
            } else if localized == count {
                "~CURRENT --".to_string()
            } else {
                String::new()
            };
            if localized > 0 {
                label.push_str(" l10n");
            }
            label
        };

        if !resolved.is_empty() && resolved != declared {
            label.push_str(&format!(" (_Version mismatch: json has {declared}_)"));
        }

        Classification {
            count,
            fixed,
            localized,
            first_date,
            last_date,
            label,
        }
    }
}
