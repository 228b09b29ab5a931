// src/facade.rs

use std::fmt;
use std::future::Future;
use std::path::Path;

use crate::config::{ConfigFile, load_and_validate};
use crate::engine::Flow;
use crate::errors::Result;
use crate::exec::{BoxTask, SharedRunner, default_runner};
use crate::iter;
use crate::types::{FailurePolicy, FlowKind};

/// Entry point carrying configured defaults.
///
/// The free functions ([`series`](crate::series), [`each`](crate::each),
/// ...) use built-in defaults; a `Flw` built from a [`ConfigFile`] applies
/// the configured failure policy and `each` limit instead, and can swap the
/// task runner for every flow it creates.
#[derive(Clone)]
pub struct Flw {
    failure_policy: FailurePolicy,
    each_limit: usize,
    runner: SharedRunner,
}

impl fmt::Debug for Flw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flw")
            .field("failure_policy", &self.failure_policy)
            .field("each_limit", &self.each_limit)
            .finish_non_exhaustive()
    }
}

impl Default for Flw {
    fn default() -> Self {
        Self::new(&ConfigFile::default())
    }
}

impl Flw {
    pub fn new(cfg: &ConfigFile) -> Self {
        Self {
            failure_policy: cfg.failure_policy,
            each_limit: cfg.each_limit.max(1),
            runner: default_runner(),
        }
    }

    /// Load and validate a TOML config, then build from it.
    pub fn from_config_path(path: impl AsRef<Path>) -> Result<Self> {
        let cfg = load_and_validate(path)?;
        Ok(Self::new(&cfg))
    }

    pub fn with_runner(mut self, runner: SharedRunner) -> Self {
        self.runner = runner;
        self
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn each_limit(&self) -> usize {
        self.each_limit
    }

    pub fn flow(&self, kind: FlowKind, tasks: impl IntoIterator<Item = BoxTask>) -> Flow {
        Flow::new(kind, tasks)
            .with_failure_policy(self.failure_policy)
            .with_runner(self.runner.clone())
    }

    pub fn series(&self, tasks: impl IntoIterator<Item = BoxTask>) -> Flow {
        self.flow(FlowKind::Series, tasks)
    }

    pub fn parallel(&self, tasks: impl IntoIterator<Item = BoxTask>) -> Flow {
        self.flow(FlowKind::Parallel, tasks)
    }

    /// [`iter::each_limit`] with the configured limit.
    pub async fn each<I, T, R, F, Fut>(&self, items: I, f: F) -> Result<Vec<R>>
    where
        I: IntoIterator<Item = T>,
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    {
        iter::each_limit(items, self.each_limit, f).await
    }

    pub async fn each_series<I, T, R, F, Fut>(&self, items: I, f: F) -> Result<Vec<R>>
    where
        I: IntoIterator<Item = T>,
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    {
        iter::each_series(items, f).await
    }

    pub async fn n<R, F, Fut>(&self, count: usize, f: F) -> Result<Vec<R>>
    where
        R: Send + 'static,
        F: Fn(usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    {
        iter::n(count, f).await
    }
}
