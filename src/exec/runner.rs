// src/exec/runner.rs

//! Pluggable task runner abstraction.
//!
//! Executors never call a task directly. They hand it to a [`TaskRunner`],
//! which defers the actual call to a later turn of the async runtime, so
//! the caller of a flow always regains control before any step body runs
//! and long sequential chains never grow the stack.
//!
//! - [`TokioRunner`] is the default implementation; each step becomes its
//!   own Tokio task.
//! - Tests can provide their own runner that, for example, records the
//!   order in which steps were dispatched.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::trace;

use crate::context::Context;
use crate::exec::task::BoxTask;

/// Handle to a dispatched step. Resolves with the step's own outcome, or a
/// join error if the step panicked or was aborted.
pub type StepHandle = JoinHandle<anyhow::Result<()>>;

/// Trait abstracting how a flow's steps are scheduled.
pub trait TaskRunner: Send + Sync {
    /// Schedule `task` against `ctx` without running any of it on the
    /// caller's stack.
    ///
    /// Must be called from within a Tokio runtime.
    fn dispatch(&self, task: BoxTask, ctx: Context) -> StepHandle;
}

/// Runner used in production: one `tokio::spawn` per step.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRunner;

impl TaskRunner for TokioRunner {
    fn dispatch(&self, task: BoxTask, ctx: Context) -> StepHandle {
        trace!("dispatching step onto the runtime");
        // The task is only invoked inside the spawned future.
        tokio::spawn(async move { task.call(ctx).await })
    }
}

/// Shared runner handle as stored by flows.
pub type SharedRunner = Arc<dyn TaskRunner>;

/// The runner flows use unless told otherwise.
pub fn default_runner() -> SharedRunner {
    Arc::new(TokioRunner)
}
