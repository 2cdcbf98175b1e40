//! Configuration for sparkwire
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for the block metadata store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// File holding the block metadata documents
    pub store_path: PathBuf,

    /// Open the store without ever writing the file
    pub read_only: bool,

    // -------------------------------------------------------------------------
    // Worker Configuration
    // -------------------------------------------------------------------------
    /// How long a caller waits for its queued action (milliseconds)
    pub action_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("./sparkwire_blocks.db"),
            read_only: false,
            action_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Action timeout as a Duration
    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the store file path
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.store_path = path.into();
        self
    }

    /// Open the store read-only
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.config.read_only = read_only;
        self
    }

    /// Set the action timeout (in milliseconds)
    pub fn action_timeout_ms(mut self, ms: u64) -> Self {
        self.config.action_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
