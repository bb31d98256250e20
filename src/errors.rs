//! Error types for epub_distill

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, DistillError>;

/// Errors surfaced by summarization and EPUB extraction
#[derive(Debug, Error)]
pub enum DistillError {
    /// The requested ranking algorithm is not one of lexrank, lsa, textrank
    #[error("unsupported summarization algorithm '{0}' (expected lexrank, lsa or textrank)")]
    UnsupportedAlgorithm(String),

    /// The requested summary length is not a positive integer
    #[error("sentence count must be a positive integer, got {0}")]
    InvalidSentenceCount(usize),

    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The EPUB container could not be opened or read
    #[error("failed to read EPUB '{path}': {message}")]
    Epub { path: PathBuf, message: String },

    /// No document in the book matches a table-of-contents href
    #[error("no chapter document matches href '{0}'")]
    ChapterNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed configuration file: {0}")]
    Config(#[from] serde_json::Error),
}

impl DistillError {
    /// Create an invalid-configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        DistillError::InvalidConfig(message.into())
    }

    /// Create an EPUB error for the given archive path
    pub fn epub(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        DistillError::Epub {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_algorithm_message() {
        let err = DistillError::UnsupportedAlgorithm("bogus".to_string());
        assert!(err.to_string().contains("'bogus'"));
    }

    #[test]
    fn test_invalid_config_helper() {
        let err = DistillError::invalid_config("damping must be in (0, 1)");
        assert!(matches!(err, DistillError::InvalidConfig(ref m) if m.contains("damping")));
    }

    #[test]
    fn test_epub_helper_keeps_path() {
        let err = DistillError::epub("book.epub", "bad container");
        match err {
            DistillError::Epub { path, message } => {
                assert_eq!(path, PathBuf::from("book.epub"));
                assert_eq!(message, "bad container");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
