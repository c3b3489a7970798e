//! Configuration management for Unreleased.
//!
//! This crate handles two kinds of input:
//! - the optional `unreleased.toml` settings file (endpoints, delays, wording)
//! - the operator-maintained override tables read from stdin

mod error;
mod loader;
mod overrides;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_FILE_NAME, find_and_load_config, find_and_load_config_from, load_config};
pub use overrides::{OverrideTable, OverrideTables, OverrideValue};
pub use schema::{
    Config, FeedConfig, GithubConfig, IssuesConfig, ReportConfig, SvnConfig, WikiConfig,
};
