//! Source-control collaborators for Unreleased.
//!
//! This crate provides the network and subprocess plumbing:
//! - [`PoliteClient`]: HTTP with a fixed delay and a single retry
//! - [`GithubClient`]: Tags, commits, organization repositories and raw files
//! - [`SvnClient`]: Tag listing, trunk listing and logs through the `svn` CLI
//! - [`project_version`]: Version lookup in a Maven project descriptor

mod error;
mod github;
mod http;
mod pom;
mod svn;

pub use error::{ScmError, ScmResult};
pub use github::{
    CommitDetail, GithubClient, GithubCommit, GithubRepo, GithubTag, ObjectRef, Signature,
    revisions_through,
};
pub use http::PoliteClient;
pub use pom::project_version;
pub use svn::{SvnClient, SvnTag, parse_dir_listing, parse_log, parse_tag_list};
