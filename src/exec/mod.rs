// src/exec/mod.rs

//! Step execution layer.
//!
//! - [`task`] defines the [`Task`] trait every flow step implements.
//! - [`runner`] provides the [`TaskRunner`] trait and the [`TokioRunner`]
//!   that defers each step onto the Tokio runtime. Tests can replace it.
//! - [`wrap`] adapts plain async functions into steps, optionally storing
//!   their result in the context.

pub mod runner;
pub mod task;
pub mod wrap;

pub use runner::{SharedRunner, StepHandle, TaskRunner, TokioRunner, default_runner};
pub use task::{BoxTask, Task, TaskFuture, task};
pub use wrap::{wrap, wrap_into, wrap_with};
