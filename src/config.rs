//! Runtime configuration for the interaction core.
//!
//! Configuration is a plain serde structure. Hosts may embed it in their own
//! configuration documents or load it from a JSON string; missing fields fall
//! back to the defaults in [`model::constants`](crate::model::constants).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::model::constants::*;

/// Tunables for debouncing and logging.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Quiet period after the last raw sample before an interaction is
    /// considered stopped.
    pub quiet_interval_ms: u64,
    /// `tracing` filter directive, e.g. `"filterpane=debug"`.
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiet_interval_ms: DEFAULT_QUIET_INTERVAL_MS,
            log_level: None,
        }
    }
}

impl Config {
    /// Parse a JSON document and clamp it into the accepted ranges.
    pub fn from_json(contents: &str) -> Result<Self> {
        let mut config: Config = serde_json::from_str(contents).map_err(ConfigError::from)?;
        config.validate();
        Ok(config)
    }

    /// Clamps all values to valid ranges.
    pub fn validate(&mut self) {
        self.quiet_interval_ms = self
            .quiet_interval_ms
            .clamp(MIN_QUIET_INTERVAL_MS, MAX_QUIET_INTERVAL_MS);
        if self
            .log_level
            .as_deref()
            .is_some_and(|level| level.trim().is_empty())
        {
            self.log_level = None;
        }
    }

    /// The debounce quiet interval as a `Duration`.
    pub fn quiet_interval(&self) -> Duration {
        Duration::from_millis(self.quiet_interval_ms)
    }

    /// The effective log filter directive.
    pub fn log_directive(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
