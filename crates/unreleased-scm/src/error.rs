//! Source-control error types.

use thiserror::Error;

/// Source-control and transport errors.
#[derive(Debug, Error)]
pub enum ScmError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// XML document did not match the expected shape.
    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    /// Malformed XML.
    #[error("XML read error: {0}")]
    XmlRead(#[from] quick_xml::Error),

    /// External command exited unsuccessfully.
    #[error("`{command}` failed ({status}): {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for source-control operations.
pub type ScmResult<T> = Result<T, ScmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_display() {
        let err = ScmError::Command {
            command: "svn ls".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "E170013: Unable to connect".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`svn ls` failed (exit status: 1): E170013: Unable to connect"
        );
    }

    #[test]
    fn test_error_is_debug() {
        let err = ScmError::Io(std::io::Error::other("boom"));
        let debug = format!("{err:?}");
        assert!(debug.contains("Io"));
    }
}
