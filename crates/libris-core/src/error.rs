//! Error types for libris.

use std::path::PathBuf;

use thiserror::Error;

use crate::ingest::ValidationError;

/// Result type alias using libris's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for libris operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed
    #[error("Migration error: {0}")]
    Migration(String),

    /// A raw record in an ingestion batch failed validation.
    /// The whole batch is rejected.
    #[error("Invalid record at index {index}: {source}")]
    Validation {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// Seed file missing or unreadable
    #[error("Seed source unavailable ({}): {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ValidationReason;

    #[test]
    fn test_error_display_validation() {
        let err = Error::Validation {
            index: 3,
            source: ValidationError::new("title", ValidationReason::Missing),
        };
        assert_eq!(
            err.to_string(),
            "Invalid record at index 3: field `title`: required field is missing"
        );
    }

    #[test]
    fn test_error_display_source_unavailable() {
        let err = Error::SourceUnavailable {
            path: PathBuf::from("/tmp/data.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/data.json"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("page must be >= 1".to_string());
        assert_eq!(err.to_string(), "Invalid input: page must be >= 1");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<Vec<serde_json::Value>>("{\"not\": \"an array\"}");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_validation_error_exposes_source() {
        use std::error::Error as _;

        let err = Error::Validation {
            index: 0,
            source: ValidationError::new("item_type", ValidationReason::UnknownVariant {
                value: "magazine".to_string(),
            }),
        };
        let source = err.source().expect("validation error has a source");
        assert!(source.to_string().contains("magazine"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
