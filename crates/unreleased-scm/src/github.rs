//! GitHub REST client.

use serde::Deserialize;
use tracing::warn;
use unreleased_history::Revision;

use crate::PoliteClient;

/// A tag as returned by `GET /repos/{repo}/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubTag {
    /// Tag name.
    pub name: String,
    /// Commit the tag points at.
    pub commit: ObjectRef,
}

/// Reference to a git object.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRef {
    /// Object SHA.
    pub sha: String,
}

/// A commit as returned by `GET /repos/{repo}/commits`.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubCommit {
    /// Commit SHA.
    pub sha: String,
    /// Commit details.
    pub commit: CommitDetail,
}

/// Commit details.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    /// Author signature.
    pub author: Signature,
    /// Full commit message.
    #[serde(default)]
    pub message: String,
}

/// Author signature; only the timestamp is used.
#[derive(Debug, Clone, Deserialize)]
pub struct Signature {
    /// RFC 3339 timestamp.
    pub date: String,
}

/// A repository as returned by `GET /orgs/{org}/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubRepo {
    /// Repository name (without owner).
    pub name: String,
}

/// GitHub API client.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: PoliteClient,
    api_url: String,
    raw_url: String,
}

impl GithubClient {
    /// Creates a new client.
    ///
    /// `api_url` is the REST root (e.g. `https://api.github.com`), `raw_url`
    /// the web root serving `/{repo}/raw/{ref}/{path}`.
    #[must_use]
    pub fn new(http: PoliteClient, api_url: impl Into<String>, raw_url: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            raw_url: raw_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Lists the tags of `owner/repo`.
    pub async fn tags(&self, repo: &str) -> Option<Vec<GithubTag>> {
        self.http
            .get_json(&format!("{}/repos/{repo}/tags", self.api_url))
            .await
    }

    /// Lists the most recent commits of `owner/repo`, newest first.
    pub async fn commits(&self, repo: &str) -> Option<Vec<GithubCommit>> {
        self.http
            .get_json(&format!("{}/repos/{repo}/commits", self.api_url))
            .await
    }

    /// Lists one page (100 entries) of an organization's repositories.
    pub async fn org_repos(&self, org: &str, page: u32) -> Option<Vec<GithubRepo>> {
        self.http
            .get_json(&format!(
                "{}/orgs/{org}/repos?page={page}&per_page=100",
                self.api_url
            ))
            .await
    }

    /// Fetches a file of `owner/repo` at the given tag or commit.
    pub async fn raw_file(&self, repo: &str, reference: &str, path: &str) -> Option<String> {
        self.http
            .get_text(&format!("{}/{repo}/raw/{reference}/{path}", self.raw_url))
            .await
    }
}

/// Collects revisions from a newest-first commit list down to the boundary.
///
/// Every commit is taken before it is compared with `boundary_sha`, so the
/// boundary commit itself is the last (oldest) entry. If the boundary is not
/// in the list, every commit is returned.
pub fn revisions_through(commits: &[GithubCommit], boundary_sha: &str) -> Vec<Revision> {
    let mut revisions = Vec::new();
    for commit in commits {
        match Revision::from_timestamp(&commit.commit.author.date, commit.commit.message.as_str()) {
            Some(revision) => revisions.push(revision),
            None => warn!(
                sha = %commit.sha,
                date = %commit.commit.author.date,
                "skipping commit with unreadable date"
            ),
        }
        if commit.sha == boundary_sha {
            break;
        }
    }
    revisions
}
