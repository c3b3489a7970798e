//! Core error types.

use thiserror::Error;

/// Core-related errors.
///
/// Only failures that make a report meaningless are errors; everything else
/// degrades to a warning and a visible artifact in the report.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The metadata feed could not be fetched.
    #[error("unable to fetch plugin metadata from {url}")]
    Feed {
        url: String,
        #[source]
        source: unreleased_scm::ScmError,
    },

    /// The metadata feed is not valid JSON.
    #[error("malformed plugin metadata: {0}")]
    FeedFormat(#[from] serde_json::Error),

    /// Source-control error.
    #[error("source control error: {0}")]
    Scm(#[from] unreleased_scm::ScmError),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
