//! Core library for Unreleased.
//!
//! This crate reconciles each plugin's latest release with its trunk and
//! turns the difference into a wiki report:
//! - [`TagMatcher`] and [`LooseVersion`] find the latest release among tags
//! - [`RevisionSource`] collects revisions since that release from git or svn
//! - [`ChangeClassifier`] labels the revisions
//! - [`Report`] sorts and renders the rows
//! - [`ReportRun`] drives one complete run

mod backend;
mod classifier;
mod context;
mod error;
mod feed;
mod report;
mod resolver;
mod run;
mod version;

pub use backend::{Collected, GithubBackend, Release, RevisionSource, SvnBackend, collect};
pub use classifier::{ChangeClassifier, Classification, is_localization, is_release_noise};
pub use context::RunContext;
pub use error::{CoreError, CoreResult};
pub use feed::{FeedPlugin, PluginRecord, ScmKind, UpdateCenter, parse_feed};
pub use report::{Report, ReportRow, colorize, render_footer};
pub use resolver::{SvnRelease, SvnTagIndex, TagMatch, TagMatcher, TagRule, VersionLookup, latest_release};
pub use run::ReportRun;
pub use version::LooseVersion;
