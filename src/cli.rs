// src/cli.rs

//! CLI argument parsing for the `flw-bench` binary, using `clap`.

use std::str::FromStr;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `flw-bench`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "flw-bench",
    version,
    about = "Measure the overhead of flw series/parallel/composed flows.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Flw.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Flows to run per case and round.
    #[arg(long, default_value_t = 10_000)]
    pub iterations: usize,

    /// How many times to repeat the whole set of cases.
    #[arg(long, default_value_t = 2)]
    pub rounds: usize,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FLW_LOG`, then `[log].level`, then `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the effective configuration and cases without running them.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI and in `[log].level`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!(
                "invalid log level: {other} (expected error, warn, info, debug or trace)"
            )),
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
