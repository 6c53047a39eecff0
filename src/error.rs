//! Error types for pdfnotes library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfnotes operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while collecting and rendering annotations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration, detected when the configuration is loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A color specification could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The document source failed to deliver a page or its content.
    #[error("Source error in {document}: {message}")]
    Source {
        /// Name of the failing document
        document: String,
        /// What went wrong
        message: String,
    },

    /// Error during rendering (Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a [`Error::Source`] for the named document.
    pub fn upstream(document: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Source {
            document: document.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );

        let err = Error::upstream("paper.pdf", "page 3 unreadable");
        assert_eq!(err.to_string(), "Source error in paper.pdf: page 3 unreadable");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
