// src/config/validate.rs

use std::str::FromStr;

use crate::cli::LogLevel;
use crate::config::model::RawConfigFile;
use crate::errors::{FlwError, Result};
use crate::types::FailurePolicy;

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - `[flow].failure_policy` is a known policy
/// - `[each].limit >= 1`
/// - `[log].level`, if present, is a known level
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_flow_section(cfg)?;
    validate_each_section(cfg)?;
    validate_log_section(cfg)?;
    Ok(())
}

fn validate_flow_section(cfg: &RawConfigFile) -> Result<()> {
    FailurePolicy::from_str(&cfg.flow.failure_policy)
        .map_err(|e| FlwError::ConfigError(format!("invalid [flow].failure_policy: {e}")))?;
    Ok(())
}

fn validate_each_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.each.limit == 0 {
        return Err(FlwError::ConfigError(
            "[each].limit must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_log_section(cfg: &RawConfigFile) -> Result<()> {
    if let Some(level) = cfg.log.level.as_deref() {
        LogLevel::from_str(level)
            .map_err(|e| FlwError::ConfigError(format!("invalid [log].level: {e}")))?;
    }
    Ok(())
}
