//! Logging bootstrap.
//!
//! The library crates log through the `log` facade. The binary installs a
//! `tracing-subscriber` formatter that also captures `log` records, writing
//! only to the file named by `ARCADE_LOG` since the terminal belongs to the
//! game.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, DEFAULT_LOG_LEVEL};

/// Install the file logger; returns `false` when no log file is configured
pub fn init(config: &Config) -> Result<bool> {
    let Some(path) = &config.log_file else {
        return Ok(false);
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;

    for warning in &config.warnings {
        log::warn!("{warning}");
    }
    log::info!("logging to {} at {}", path.display(), config.log_level);
    Ok(true)
}
