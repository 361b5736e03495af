//! Request-layer configuration.
//!
//! # Example
//! ```rust
//! use recipe_schemas::ValidatorConfig;
//!
//! let config = ValidatorConfig::default()
//!     .with_max_input_size(64 * 1024)
//!     .with_log_rejections(false);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default upper bound on a request body, in serialized bytes.
pub const DEFAULT_MAX_INPUT_SIZE: usize = 1024 * 1024;

/// Error type for configuration validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("max_input_size must be greater than 0")]
    InvalidMaxInputSize,
}

/// Settings for the request helpers in [`crate::request`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Bodies larger than this are rejected before validation (default 1MB)
    pub max_input_size: usize,
    /// Log every rejected body with the fields that failed
    pub log_rejections: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            log_rejections: true,
        }
    }
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum accepted body size in bytes.
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    pub fn with_log_rejections(mut self, enabled: bool) -> Self {
        self.log_rejections = enabled;
        self
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_input_size == 0 {
            return Err(ConfigError::InvalidMaxInputSize);
        }
        Ok(())
    }
}
