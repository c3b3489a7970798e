//! Configuration schema.
//!
//! Every field has a default matching the public Jenkins infrastructure, so an
//! empty (or missing) `unreleased.toml` is a valid configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Plugin metadata feed.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Hosted git (GitHub) settings.
    #[serde(default)]
    pub github: GithubConfig,

    /// Legacy svn settings.
    #[serde(default)]
    pub svn: SvnConfig,

    /// Issue tracker settings.
    #[serde(default)]
    pub issues: IssuesConfig,

    /// Report wording.
    #[serde(default)]
    pub report: ReportConfig,

    /// Wiki publishing target.
    #[serde(default)]
    pub wiki: WikiConfig,
}

/// Metadata feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// URL of the update-center JSON (optionally JSONP-wrapped).
    #[serde(default = "default_feed_url")]
    pub url: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
        }
    }
}

fn default_feed_url() -> String {
    "http://updates.jenkins-ci.org/update-center.json".to_string()
}

/// GitHub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// REST API base URL.
    #[serde(default = "default_github_api")]
    pub api_url: String,

    /// Web base URL, used for compare links and unreleased rows.
    #[serde(default = "default_github_web")]
    pub web_url: String,

    /// Base URL for raw file downloads.
    #[serde(default = "default_github_web")]
    pub raw_url: String,

    /// Organization owning the plugin repositories.
    #[serde(default = "default_organization")]
    pub organization: String,

    /// Branch compared against the release tag.
    #[serde(default = "default_compare_branch")]
    pub compare_branch: String,

    /// Seconds to wait before every GitHub request.
    #[serde(default = "default_delay")]
    pub delay_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_api(),
            web_url: default_github_web(),
            raw_url: default_github_web(),
            organization: default_organization(),
            compare_branch: default_compare_branch(),
            delay_secs: default_delay(),
        }
    }
}

fn default_github_api() -> String {
    "https://api.github.com".to_string()
}

fn default_github_web() -> String {
    "https://github.com".to_string()
}

fn default_organization() -> String {
    "jenkinsci".to_string()
}

fn default_compare_branch() -> String {
    "master".to_string()
}

fn default_delay() -> u64 {
    3
}

/// svn configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvnConfig {
    /// The svn executable.
    #[serde(default = "default_svn_command")]
    pub command: String,

    /// Repository root URL.
    #[serde(default = "default_svn_base")]
    pub base_url: String,

    /// Directories (relative to the root) holding release tags.
    #[serde(default = "default_tag_dirs")]
    pub tag_dirs: Vec<String>,

    /// Directory (relative to the root) holding plugin trunks.
    #[serde(default = "default_plugins_path")]
    pub plugins_path: String,

    /// FishEye base URL used for change links.
    #[serde(default = "default_fisheye")]
    pub fisheye_url: String,
}

impl Default for SvnConfig {
    fn default() -> Self {
        Self {
            command: default_svn_command(),
            base_url: default_svn_base(),
            tag_dirs: default_tag_dirs(),
            plugins_path: default_plugins_path(),
            fisheye_url: default_fisheye(),
        }
    }
}

impl SvnConfig {
    /// Returns the absolute URLs of all tag directories.
    #[must_use]
    pub fn tag_urls(&self) -> Vec<String> {
        self.tag_dirs
            .iter()
            .map(|dir| format!("{}/{dir}", self.base_url))
            .collect()
    }

    /// Returns the absolute URL of the plugin trunk directory.
    #[must_use]
    pub fn plugins_url(&self) -> String {
        format!("{}/{}", self.base_url, self.plugins_path)
    }
}

fn default_svn_command() -> String {
    "svn".to_string()
}

fn default_svn_base() -> String {
    "https://svn.jenkins-ci.org".to_string()
}

fn default_tag_dirs() -> Vec<String> {
    vec![
        "tags".to_string(),
        "tags/global-build-stats".to_string(),
        "tags/scm-sync-configuration".to_string(),
    ]
}

fn default_plugins_path() -> String {
    "trunk/hudson/plugins".to_string()
}

fn default_fisheye() -> String {
    "http://fisheye.jenkins-ci.org".to_string()
}

/// Issue tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuesConfig {
    /// Browse URL of the tracker.
    #[serde(default = "default_issue_url")]
    pub url: String,

    /// Project key used when linking fixed issues.
    #[serde(default = "default_issue_project")]
    pub project: String,
}

impl Default for IssuesConfig {
    fn default() -> Self {
        Self {
            url: default_issue_url(),
            project: default_issue_project(),
        }
    }
}

fn default_issue_url() -> String {
    "http://issues.jenkins-ci.org/browse".to_string()
}

fn default_issue_project() -> String {
    "JENKINS".to_string()
}

/// Report wording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Ecosystem name used in the heading.
    #[serde(default = "default_ecosystem")]
    pub ecosystem: String,

    /// How often the report is regenerated.
    #[serde(default = "default_schedule")]
    pub schedule: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            ecosystem: default_ecosystem(),
            schedule: default_schedule(),
        }
    }
}

fn default_ecosystem() -> String {
    "Jenkins".to_string()
}

fn default_schedule() -> String {
    "once per week".to_string()
}

/// Wiki publishing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiConfig {
    /// XML-RPC endpoint.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Login user.
    #[serde(default = "default_wiki_user")]
    pub user: String,

    /// Space key holding the page.
    #[serde(default = "default_wiki_space")]
    pub space: String,

    /// Page title.
    #[serde(default = "default_wiki_page")]
    pub page: String,

    /// File whose first line is the password.
    ///
    /// Defaults to `$SECRET_DIR/pwfile`.
    #[serde(default)]
    pub password_file: Option<PathBuf>,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            user: default_wiki_user(),
            space: default_wiki_space(),
            page: default_wiki_page(),
            password_file: None,
        }
    }
}

impl WikiConfig {
    /// Resolves the password file path.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is configured and `SECRET_DIR` is unset.
    pub fn password_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.password_file {
            return Ok(path.clone());
        }
        std::env::var_os("SECRET_DIR")
            .map(|dir| PathBuf::from(dir).join("pwfile"))
            .ok_or_else(|| {
                ConfigError::Invalid("wiki.password_file is not set and SECRET_DIR is unset".into())
            })
    }

    /// Reads the password (first line of the password file, trailing whitespace removed).
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved or the file cannot be read.
    pub fn read_password(&self) -> ConfigResult<String> {
        let path = self.password_path()?;
        let content = std::fs::read_to_string(&path)?;
        Ok(content.lines().next().unwrap_or("").trim_end().to_string())
    }
}

fn default_rpc_url() -> String {
    "https://wiki.jenkins-ci.org/rpc/xmlrpc".to_string()
}

fn default_wiki_user() -> String {
    "jenkins".to_string()
}

fn default_wiki_space() -> String {
    "jenkins".to_string()
}

fn default_wiki_page() -> String {
    "Unreleased Plugin Changes".to_string()
}
