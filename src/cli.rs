use std::path::PathBuf;
use clap::Parser;
use anyhow::Result;

use crate::config::{OutputFormat, WatchConfig};

#[derive(Parser, Debug)]
#[command(name = "dirpoll")]
#[command(version)]
#[command(about = "Poll a directory and report files as they are created or deleted")]
pub struct Cli {
    /// Directory to watch for changes
    #[arg(value_name = "PATH", help = "Directory to watch (defaults to ./lab151)")]
    pub path: Option<PathBuf>,

    /// Polling interval in milliseconds
    #[arg(long, help = "Polling interval in ms [default: 1000]")]
    pub interval: Option<u64>,

    /// Output format
    #[arg(long, help = "Output format [default: text]")]
    pub output: Option<OutputFormat>,

    /// Optional TOML configuration file
    #[arg(long, value_name = "FILE", help = "Load settings from a TOML file")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the effective configuration: defaults, then the config file,
    /// then the environment, then any flags given on the command line.
    pub fn resolve_config(&self) -> Result<WatchConfig> {
        let mut config = match &self.config {
            Some(path) => WatchConfig::from_file(path)?,
            None => WatchConfig::default(),
        };
        config.apply_env();

        if let Some(path) = &self.path {
            config.directory = path.clone();
        }
        if let Some(interval) = self.interval {
            config.poll_interval_ms = interval;
        }
        if let Some(output) = self.output {
            config.output = output;
        }

        Ok(config)
    }

    pub fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }
}
