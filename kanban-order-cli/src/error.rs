//! Error types for the kanban-order command line

use std::path::PathBuf;

use kanban_order::OrderError;
use thiserror::Error;

/// Result type for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),

    #[error("list not found: {0}")]
    UnknownList(String),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl From<kanban_order::ConfigError> for CliError {
    fn from(err: kanban_order::ConfigError) -> Self {
        Self::Order(OrderError::Config(err))
    }
}
