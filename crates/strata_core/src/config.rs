//! World configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`WorldConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid world configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tuning knobs for a [`World`](crate::ecs::World).
///
/// Missing fields fall back to [`WorldConfig::default`], so a partial JSON
/// document such as `{}` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Rows reserved in every column when an archetype is first created.
    pub initial_capacity: usize,
}

impl WorldConfig {
    /// Rows reserved per column unless configured otherwise.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize this configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
        }
    }
}
