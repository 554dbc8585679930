//! Configuration for dirpoll
//!
//! Settings come from, in increasing precedence: built-in defaults, an
//! optional TOML file, `DIRPOLL_*` environment variables and finally
//! command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::watcher::DEFAULT_POLL_INTERVAL;

/// Directory watched when nothing else is configured.
pub const DEFAULT_DIRECTORY: &str = "lab151";

/// How deltas are written out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable summary (default)
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Settings for a watch session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Directory to poll
    pub directory: PathBuf,
    /// Delay between polls in milliseconds
    pub poll_interval_ms: u64,
    /// Output format for the built-in listener
    pub output: OutputFormat,
    /// Create the directory at startup if it is missing
    pub create_missing: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            output: OutputFormat::Text,
            create_missing: true,
        }
    }
}

impl WatchConfig {
    /// Load settings from a TOML file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Override fields from `DIRPOLL_*` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("DIRPOLL_DIRECTORY") {
            if !val.is_empty() {
                self.directory = PathBuf::from(val);
            }
        }

        if let Ok(val) = std::env::var("DIRPOLL_POLL_INTERVAL_MS") {
            match val.parse::<u64>() {
                Ok(ms) => self.poll_interval_ms = ms,
                Err(_) => tracing::warn!("Ignoring invalid DIRPOLL_POLL_INTERVAL_MS: {}", val),
            }
        }
    }

    /// Make sure the watched directory exists before the first listing.
    ///
    /// Returns `true` when the directory was created. With `create_missing`
    /// off nothing is touched, and the tracker reports the missing directory.
    pub fn ensure_directory(&self) -> Result<bool> {
        if self.directory.exists() || !self.create_missing {
            return Ok(false);
        }

        println!(
            "Directory {} does not exist. Creating it...",
            self.directory.display()
        );
        std::fs::create_dir_all(&self.directory)
            .with_context(|| format!("Failed to create directory {}", self.directory.display()))?;
        Ok(true)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("Poll interval must be greater than 0".to_string());
        }

        if self.directory.as_os_str().is_empty() {
            return Err("Directory must not be empty".to_string());
        }

        if self.directory.exists() && !self.directory.is_dir() {
            return Err(format!(
                "Path is not a directory: {}",
                self.directory.display()
            ));
        }

        Ok(())
    }
}
