// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is up to the application. The benchmark binary uses [`init_logging`].
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `FLW_LOG` environment variable (e.g. "info", "debug")
//! 3. `[log].level` from the config file
//! 4. default to `info`
//!
//! Logs are sent to STDERR so that stdout stays free for benchmark results.

use std::str::FromStr;

use anyhow::Result;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>, config_level: Option<LogLevel>) -> Result<()> {
    let level = resolve_level(
        cli_level,
        std::env::var("FLW_LOG").ok().as_deref(),
        config_level,
    );

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}

/// Pick the effective level from the available sources.
pub fn resolve_level(
    cli_level: Option<LogLevel>,
    env_value: Option<&str>,
    config_level: Option<LogLevel>,
) -> tracing::Level {
    cli_level
        .or_else(|| env_value.and_then(|s| LogLevel::from_str(s).ok()))
        .or(config_level)
        .map(level_from_log_level)
        .unwrap_or(tracing::Level::INFO)
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}
