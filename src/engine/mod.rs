// src/engine/mod.rs

//! Flow execution engine.
//!
//! This module ties together:
//! - the sequential executor ([`series`](mod@series)), which honours the
//!   context's stop reason at step boundaries
//! - the concurrent executor ([`parallel`](mod@parallel)), which fans out all
//!   steps and fans their outcomes back in over a channel
//! - [`Flow`], the configured unit callers run or nest
//! - [`make`], shorthand for nesting flows as steps

use crate::errors::Result;
use crate::exec::BoxTask;
use crate::types::FlowKind;

/// Outcome of one dispatched step, as reported to the concurrent executor.
#[derive(Debug)]
pub struct StepEvent {
    pub index: usize,
    pub outcome: Result<()>,
}

pub mod flow;
pub mod make;
pub mod parallel;
pub mod series;

pub use flow::{Flow, FlowOutput};

/// Flow running `tasks` one at a time, in order.
pub fn series(tasks: impl IntoIterator<Item = BoxTask>) -> Flow {
    Flow::new(FlowKind::Series, tasks)
}

/// Flow running all `tasks` at once.
pub fn parallel(tasks: impl IntoIterator<Item = BoxTask>) -> Flow {
    Flow::new(FlowKind::Parallel, tasks)
}
