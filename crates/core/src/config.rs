// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is valid:
//!
//! ```toml
//! max_retry = 3
//! poll_interval = "5s"
//! max_ticks = 10000
//! cluster_shard = "5m"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for the orchestrator and its executors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrchestratorConfig {
    /// Reruns allowed before a stage gives up
    pub max_retry: u32,
    /// Wait between ticks while workers are still running
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Upper bound on ticks for one drive-to-terminal call
    pub max_ticks: u32,
    /// Shard size for L1 log clustering fan-out
    #[serde(with = "humantime_serde")]
    pub cluster_shard: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_retry: 3,
            poll_interval: Duration::from_secs(5),
            max_ticks: 10_000,
            cluster_shard: Duration::from_secs(5 * 60),
        }
    }
}

impl OrchestratorConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: OrchestratorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_ticks == 0 {
            return Err(ConfigError::Invalid("max_ticks must be positive".into()));
        }
        if self.cluster_shard.is_zero() {
            return Err(ConfigError::Invalid("cluster_shard must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
