// src/config/model.rs

use std::str::FromStr;

use serde::Deserialize;

use crate::cli::LogLevel;
use crate::errors::FlwError;
use crate::iter::DEFAULT_EACH_LIMIT;
use crate::types::FailurePolicy;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [flow]
/// failure_policy = "first_error"
///
/// [each]
/// limit = 3
///
/// [log]
/// level = "info"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub flow: FlowSection,

    #[serde(default)]
    pub each: EachSection,

    #[serde(default)]
    pub log: LogSection,
}

/// `[flow]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowSection {
    /// `"first_error"` (default) or `"collect_all"`; applies to parallel
    /// flows.
    #[serde(default = "default_failure_policy")]
    pub failure_policy: String,
}

fn default_failure_policy() -> String {
    "first_error".to_string()
}

impl Default for FlowSection {
    fn default() -> Self {
        Self {
            failure_policy: default_failure_policy(),
        }
    }
}

/// `[each]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EachSection {
    /// Maximum number of items in flight. Must be at least 1.
    #[serde(default = "default_each_limit")]
    pub limit: usize,
}

fn default_each_limit() -> usize {
    DEFAULT_EACH_LIMIT
}

impl Default for EachSection {
    fn default() -> Self {
        Self {
            limit: default_each_limit(),
        }
    }
}

/// `[log]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogSection {
    /// Used by the benchmark binary when neither `--log-level` nor `FLW_LOG`
    /// is set.
    #[serde(default)]
    pub level: Option<String>,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub failure_policy: FailurePolicy,
    pub each_limit: usize,
    pub log_level: Option<LogLevel>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            each_limit: DEFAULT_EACH_LIMIT,
            log_level: None,
        }
    }
}

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = FlwError;

    fn try_from(raw: RawConfigFile) -> Result<Self, Self::Error> {
        crate::config::validate::validate_config(&raw)?;

        let failure_policy =
            FailurePolicy::from_str(&raw.flow.failure_policy).map_err(FlwError::ConfigError)?;
        let log_level = raw
            .log
            .level
            .as_deref()
            .map(LogLevel::from_str)
            .transpose()
            .map_err(FlwError::ConfigError)?;

        Ok(Self {
            failure_policy,
            each_limit: raw.each.limit,
            log_level,
        })
    }
}
