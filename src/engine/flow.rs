// src/engine/flow.rs

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{parallel, series};
use crate::context::Context;
use crate::errors::{FlwError, Result};
use crate::exec::{BoxTask, SharedRunner, Task, TaskFuture, default_runner};
use crate::types::{ContextKey, FailurePolicy, FlowKind};

/// What a successful flow hands back.
///
/// - `Context` when no result key was configured.
/// - `Value` holding whatever the context had under the result key (if
///   anything) when one was.
#[derive(Debug, Clone)]
pub enum FlowOutput {
    Context(Context),
    Value(Option<Value>),
}

impl FlowOutput {
    pub fn context(&self) -> Option<&Context> {
        match self {
            FlowOutput::Context(ctx) => Some(ctx),
            FlowOutput::Value(_) => None,
        }
    }

    pub fn into_context(self) -> Option<Context> {
        match self {
            FlowOutput::Context(ctx) => Some(ctx),
            FlowOutput::Value(_) => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            FlowOutput::Value(v) => v,
            FlowOutput::Context(_) => None,
        }
    }

    /// Deserialize the result-key value.
    pub fn value_as<T: DeserializeOwned>(self) -> Option<T> {
        serde_json::from_value(self.into_value()?).ok()
    }
}

/// A configured list of steps plus the strategy that runs them.
///
/// Build one with [`series`](crate::series) or [`parallel`](crate::parallel),
/// optionally attach a context or result key, then either run it directly
/// or nest it inside another flow: a `Flow` is itself a [`Task`].
#[derive(Clone)]
pub struct Flow {
    kind: FlowKind,
    tasks: Vec<BoxTask>,
    context: Option<Context>,
    result_key: Option<ContextKey>,
    failure_policy: FailurePolicy,
    runner: SharedRunner,
}

impl fmt::Debug for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flow")
            .field("kind", &self.kind)
            .field("steps", &self.tasks.len())
            .field("context", &self.context)
            .field("result_key", &self.result_key)
            .field("failure_policy", &self.failure_policy)
            .finish_non_exhaustive()
    }
}

impl Flow {
    pub fn new(kind: FlowKind, tasks: impl IntoIterator<Item = BoxTask>) -> Self {
        Self {
            kind,
            tasks: tasks.into_iter().collect(),
            context: None,
            result_key: None,
            failure_policy: FailurePolicy::default(),
            runner: default_runner(),
        }
    }

    pub fn kind(&self) -> FlowKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn result_key(&self) -> Option<&str> {
        self.result_key.as_deref()
    }

    /// Run against `ctx` instead of a fresh context.
    ///
    /// The context is shared, not copied: the caller keeps seeing every write
    /// the steps make, including after a failure.
    pub fn with_context(mut self, ctx: Context) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Complete with the value under `key` instead of the whole context.
    pub fn with_result_key(mut self, key: &str) -> Self {
        self.result_key = Some(key.to_string());
        self
    }

    /// Only meaningful for parallel flows.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_runner(mut self, runner: SharedRunner) -> Self {
        self.runner = runner;
        self
    }

    /// Append a step.
    pub fn then(mut self, task: BoxTask) -> Self {
        self.tasks.push(task);
        self
    }

    /// Type-erase this flow so it can be a step of another flow.
    pub fn into_task(self) -> BoxTask {
        Arc::new(self)
    }

    /// Run the flow to completion.
    ///
    /// Uses the attached context, or a new one.
    pub async fn run(self) -> Result<FlowOutput> {
        let ctx = Context::ensure(self.context.clone());
        self.run_on(ctx).await
    }

    /// Run the flow in the background and report through `done`.
    ///
    /// Returns as soon as the flow is scheduled, before any step runs.
    /// `done` is called exactly once with the outcome and the flow's context,
    /// whether the flow succeeded or not.
    ///
    /// Fails immediately with [`FlwError::Usage`] outside a Tokio runtime.
    pub fn spawn<F>(self, done: F) -> Result<JoinHandle<()>>
    where
        F: FnOnce(Result<FlowOutput>, Context) + Send + 'static,
    {
        let handle = tokio::runtime::Handle::try_current().map_err(|e| {
            FlwError::Usage(format!(
                "Flow::spawn must be called from within a Tokio runtime: {e}"
            ))
        })?;

        let ctx = Context::ensure(self.context.clone());
        Ok(handle.spawn(async move {
            let result = self.run_on(ctx.clone()).await;
            done(result, ctx);
        }))
    }

    async fn run_on(&self, ctx: Context) -> Result<FlowOutput> {
        self.execute(&ctx).await?;

        Ok(match self.result_key.as_deref() {
            Some(key) => FlowOutput::Value(ctx.get(key)),
            None => FlowOutput::Context(ctx),
        })
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        debug!(kind = %self.kind, steps = self.tasks.len(), "flow starting");

        let result = match self.kind {
            FlowKind::Series => series::run_series(&self.tasks, ctx, self.runner.as_ref()).await,
            FlowKind::Parallel => {
                parallel::run_parallel(
                    &self.tasks,
                    ctx,
                    self.runner.as_ref(),
                    self.failure_policy,
                )
                .await
            }
        };

        debug!(kind = %self.kind, ok = result.is_ok(), "flow finished");
        result
    }
}

impl Task for Flow {
    /// Run the inner steps on the outer flow's context.
    fn call(&self, ctx: Context) -> TaskFuture {
        let flow = self.clone();
        Box::pin(async move { flow.execute(&ctx).await.map_err(anyhow::Error::from) })
    }
}
