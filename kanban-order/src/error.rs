//! Error types for board ordering

use crate::types::GroupKey;
use thiserror::Error;

/// Result type for board ordering operations
pub type Result<T> = std::result::Result<T, OrderError>;

/// Errors raised at the boundaries of the ordering core.
///
/// Grouping and position allocation themselves cannot fail. These errors come
/// from ingesting records, validating move events against a board, loading
/// configuration, and talking to the item source or sink.
#[derive(Debug, Error)]
pub enum OrderError {
    /// A source record could not be turned into an item
    #[error("invalid item at index {index}: {message}")]
    InvalidItem { index: usize, message: String },

    /// Move event names a list the board does not have
    #[error("list not found: {key}")]
    ListNotFound { key: GroupKey },

    /// Move event index outside the list it refers to
    #[error("index {index} out of bounds for list '{key}' of length {len}")]
    IndexOutOfBounds {
        key: GroupKey,
        index: usize,
        len: usize,
    },

    /// The item sink rejected a change set
    #[error("sink failed to persist {count} items: {message}")]
    Sink { count: usize, message: String },

    /// The item source stopped emitting
    #[error("item source closed")]
    SourceClosed,

    /// Configuration could not be loaded or is inconsistent
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OrderError {
    /// Create an invalid item error
    pub fn invalid_item(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidItem {
            index,
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink(count: usize, message: impl Into<String>) -> Self {
        Self::Sink {
            count,
            message: message.into(),
        }
    }

    /// Check if this is a retryable error
    ///
    /// Sink failures are transient from the core's point of view; the same
    /// change set can be handed over again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Sink { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OrderError::ListNotFound {
            key: GroupKey::from("todo"),
        };
        assert_eq!(err.to_string(), "list not found: todo");
    }

    #[test]
    fn test_out_of_bounds_display() {
        let err = OrderError::IndexOutOfBounds {
            key: GroupKey::null(),
            index: 4,
            len: 2,
        };
        assert_eq!(
            err.to_string(),
            "index 4 out of bounds for list 'null' of length 2"
        );
    }

    #[test]
    fn test_invalid_item() {
        let err = OrderError::invalid_item(3, "missing id");
        assert!(err.to_string().contains("index 3"));
        assert!(err.to_string().contains("missing id"));
    }

    #[test]
    fn test_retryable() {
        assert!(OrderError::sink(2, "disk full").is_retryable());
        assert!(!OrderError::SourceClosed.is_retryable());
    }
}
