// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::FlowKind;

#[derive(Error, Debug)]
pub enum FlwError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Programmer mistake detected at call time, never through a flow's
    /// completion.
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("{kind} step {index} failed: {source}")]
    TaskFailed {
        kind: FlowKind,
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("{kind} step {index} did not complete: {message}")]
    TaskPanicked {
        kind: FlowKind,
        index: usize,
        message: String,
    },

    #[error("item {index} failed: {source}")]
    ItemFailed {
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("item {index} did not complete: {message}")]
    ItemPanicked { index: usize, message: String },

    #[error("{} of {total} parallel steps failed", .errors.len())]
    Multiple { errors: Vec<FlwError>, total: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlwError {
    /// Index of the step or item that produced this error, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            FlwError::TaskFailed { index, .. }
            | FlwError::TaskPanicked { index, .. }
            | FlwError::ItemFailed { index, .. }
            | FlwError::ItemPanicked { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub(crate) fn from_join(kind: FlowKind, index: usize, err: tokio::task::JoinError) -> Self {
        FlwError::TaskPanicked {
            kind,
            index,
            message: join_message(err),
        }
    }
}

/// Describe why a spawned step never produced an outcome.
pub(crate) fn join_message(err: tokio::task::JoinError) -> String {
    if !err.is_panic() {
        return "task was cancelled".to_string();
    }
    let payload = err.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("task panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("task panicked: {s}")
    } else {
        "task panicked".to_string()
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FlwError>;
