// src/exec/task.rs

//! The unit of work a flow runs.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;

/// Future returned by a task. Resolves exactly once with the step outcome.
pub type TaskFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

/// A step of a flow.
///
/// A task receives the flow's [`Context`] and reports success or failure.
/// Any `Fn(Context) -> impl Future<Output = anyhow::Result<()>>` closure is a
/// task; flows themselves are tasks too, which is how they nest.
pub trait Task: Send + Sync + 'static {
    fn call(&self, ctx: Context) -> TaskFuture;
}

impl<F, Fut> Task for F
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    fn call(&self, ctx: Context) -> TaskFuture {
        Box::pin(self(ctx))
    }
}

/// Shared, type-erased task as stored in a flow's step list.
pub type BoxTask = Arc<dyn Task>;

/// Turn a closure into a [`BoxTask`].
///
/// ```ignore
/// let step = task(|ctx: Context| async move {
///     ctx.set("answer", 42);
///     Ok(())
/// });
/// ```
pub fn task<F, Fut>(f: F) -> BoxTask
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(f)
}
