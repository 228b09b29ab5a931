// src/engine/make.rs

//! Deferred flows, ready to be used as a step of another flow.
//!
//! ```ignore
//! series([
//!     make::parallel([pre_a, pre_b]),
//!     make::series([work_a, work_b]),
//! ])
//! .run()
//! .await?;
//! ```
//!
//! To pre-configure a nested flow (result key, failure policy, runner) build
//! it with [`series`](super::series) / [`parallel`](super::parallel) and call
//! [`Flow::into_task`](super::Flow::into_task).

use crate::exec::BoxTask;

pub fn series(tasks: impl IntoIterator<Item = BoxTask>) -> BoxTask {
    super::series(tasks).into_task()
}

pub fn parallel(tasks: impl IntoIterator<Item = BoxTask>) -> BoxTask {
    super::parallel(tasks).into_task()
}
