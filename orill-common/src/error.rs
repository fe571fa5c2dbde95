//! Common error types for orill

use thiserror::Error;

/// Common result type for orill operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across orill services
///
/// Storage errors are surfaced as-is; nothing in the library retries them.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error (fatal at construction time)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An analyzer broke its contract (panicked instead of degrading)
    #[error("Analyzer fault in '{analyzer}': {message}")]
    AnalyzerFault { analyzer: String, message: String },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for failures the caller may retry by resubmitting the cycle
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_fault_message_names_analyzer() {
        let err = Error::AnalyzerFault {
            analyzer: "dataset".to_string(),
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Analyzer fault in 'dataset': boom");
    }

    #[test]
    fn test_only_storage_errors_are_transient() {
        assert!(Error::Database(sqlx::Error::PoolClosed).is_transient());
        assert!(!Error::Config("no analyzers".to_string()).is_transient());
        assert!(!Error::InvalidInput("limit".to_string()).is_transient());
    }
}
