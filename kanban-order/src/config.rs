//! Configuration for board ordering using Figment
//!
//! Sources are merged in precedence order (later sources override earlier
//! ones):
//! 1. Default values
//! 2. An optional configuration file (TOML, YAML or JSON, by extension)
//! 3. Environment variables with the `KANBAN_ORDER_` prefix

use crate::allocate::{PositionAllocator, MAX_LIST_LEN, STEP};
use crate::ingest::ItemSchema;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Prefix of environment variables read by [`OrderConfig::load`]
pub const ENV_PREFIX: &str = "KANBAN_ORDER_";

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Configuration parsing failed
    #[error("Failed to parse configuration: {source}")]
    ParseError { source: Box<figment::Error> },

    /// Configuration validation failed
    #[error("Configuration validation failed: {message}")]
    ValidationError { message: String },

    /// Configuration file format not supported
    #[error("Unsupported configuration file format: {format}")]
    UnsupportedFormat { format: String },
}

impl ConfigError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError {
            source: Box::new(error),
        }
    }
}

/// Tuning and field naming for grouping and position allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    /// Spacing between adjacent items after renumbering
    pub step: f64,
    /// Expected upper bound on list length
    pub max_list_len: usize,
    /// Renumbering ceiling, as a multiple of `step`
    pub max_position_factor: u32,
    /// Record attribute lists are keyed by
    pub group_by: String,
    /// Record field holding the item id
    pub id_field: String,
    /// Record field holding the item position
    pub position_field: String,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            step: STEP,
            max_list_len: MAX_LIST_LEN,
            max_position_factor: 500,
            group_by: "status".to_string(),
            id_field: "id".to_string(),
            position_field: "position".to_string(),
        }
    }
}

impl OrderConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(OrderConfig::default()));

        if let Some(path) = path {
            debug!("Loading config file: {}", path.display());
            figment = figment.merge(file_provider(path)?);
        }

        let config: OrderConfig = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        config.validate()?;
        debug!(?config, "Loaded ordering configuration");
        Ok(config)
    }

    /// Check the relationships the allocator relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.step.is_finite() || self.step < 2.0 || self.step.fract() != 0.0 {
            return Err(ConfigError::validation(format!(
                "step must be a whole number of at least 2, got {}",
                self.step
            )));
        }
        if self.max_position_factor as usize <= self.max_list_len {
            return Err(ConfigError::validation(format!(
                "max_position_factor ({}) must exceed max_list_len ({})",
                self.max_position_factor, self.max_list_len
            )));
        }
        for (name, value) in [
            ("group_by", &self.group_by),
            ("id_field", &self.id_field),
            ("position_field", &self.position_field),
        ] {
            if value.is_empty() {
                return Err(ConfigError::validation(format!("{name} must not be empty")));
            }
        }
        if self.group_by == self.id_field || self.group_by == self.position_field {
            return Err(ConfigError::validation(format!(
                "group_by cannot be the id or position field ('{}')",
                self.group_by
            )));
        }
        Ok(())
    }

    /// Renumbering ceiling
    pub fn max_position(&self) -> f64 {
        self.step * f64::from(self.max_position_factor)
    }

    /// Allocator configured from these values
    pub fn allocator(&self) -> PositionAllocator {
        PositionAllocator::from_config(self)
    }

    /// Record field names for ingestion
    pub fn schema(&self) -> ItemSchema {
        ItemSchema::new(self.id_field.clone(), self.position_field.clone())
    }
}

fn file_provider(path: &Path) -> Result<Figment, ConfigError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    let provider = match extension.as_str() {
        "toml" => Figment::from(Toml::file(path)),
        "yaml" | "yml" => Figment::from(Yaml::file(path)),
        "json" => Figment::from(Json::file(path)),
        other => {
            return Err(ConfigError::UnsupportedFormat {
                format: other.to_string(),
            })
        }
    };

    if !path.is_file() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(provider)
}
