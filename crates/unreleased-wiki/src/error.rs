//! Wiki error types.

use thiserror::Error;

/// Publishing errors.
#[derive(Debug, Error)]
pub enum WikiError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed XML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Well-formed XML that is not a valid XML-RPC response.
    #[error("invalid XML-RPC response: {0}")]
    Protocol(String),

    /// The server answered with a fault.
    #[error("XML-RPC fault {code}: {message}")]
    Fault { code: i64, message: String },

    /// Missing credentials.
    #[error("config error: {0}")]
    Config(#[from] unreleased_config::ConfigError),
}

/// Result type for publishing operations.
pub type WikiResult<T> = Result<T, WikiError>;
