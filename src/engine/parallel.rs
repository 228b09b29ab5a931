// src/engine/parallel.rs

//! Concurrent executor.
//!
//! Every step is dispatched in one batch. A small forwarder per step waits
//! for the step's handle and reports a [`StepEvent`] over an mpsc channel;
//! the executor counts those events until the flow is decided.
//!
//! With [`FailurePolicy::FirstError`] the flow completes as soon as one step
//! fails. The other steps are not cancelled: they keep running, and when
//! their forwarders find the channel closed the late outcome is logged and
//! dropped. A second error is therefore never reported to the caller; use
//! [`FailurePolicy::CollectAll`] to see every failure.

use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::StepEvent;
use crate::context::Context;
use crate::errors::{FlwError, Result};
use crate::exec::{BoxTask, StepHandle, TaskRunner};
use crate::types::{FailurePolicy, FlowKind};

/// Run all `tasks` concurrently against the same `ctx`.
pub(crate) async fn run_parallel(
    tasks: &[BoxTask],
    ctx: &Context,
    runner: &dyn TaskRunner,
    policy: FailurePolicy,
) -> Result<()> {
    let total = tasks.len();
    if total == 0 {
        return Ok(());
    }

    // Capacity for every step so forwarders never wait on the executor.
    let (tx, mut rx) = mpsc::channel::<StepEvent>(total);

    for (index, task) in tasks.iter().enumerate() {
        let handle = runner.dispatch(Arc::clone(task), ctx.clone());
        tokio::spawn(forward_outcome(index, handle, tx.clone()));
    }
    drop(tx);
    debug!(total, ?policy, "parallel: all steps dispatched");

    let mut completed = 0usize;
    let mut failures: Vec<FlwError> = Vec::new();

    while let Some(event) = rx.recv().await {
        completed += 1;

        if let Err(err) = event.outcome {
            match policy {
                FailurePolicy::FirstError => {
                    debug!(
                        index = event.index,
                        completed,
                        total,
                        "parallel step failed; completing flow with first error"
                    );
                    return Err(err);
                }
                FailurePolicy::CollectAll => failures.push(err),
            }
        }

        if completed == total {
            break;
        }
    }

    if completed < total {
        return Err(FlwError::Other(anyhow!(
            "parallel flow lost {} of {total} step outcomes",
            total - completed
        )));
    }

    if failures.is_empty() {
        Ok(())
    } else {
        failures.sort_by_key(|e| e.index().unwrap_or(usize::MAX));
        Err(FlwError::Multiple {
            errors: failures,
            total,
        })
    }
}

/// Wait for one step and report its outcome to the executor.
async fn forward_outcome(index: usize, handle: StepHandle, tx: mpsc::Sender<StepEvent>) {
    let outcome = match handle.await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(source)) => Err(FlwError::TaskFailed {
            kind: FlowKind::Parallel,
            index,
            source,
        }),
        Err(join_err) => Err(FlwError::from_join(FlowKind::Parallel, index, join_err)),
    };

    if let Err(mpsc::error::SendError(event)) = tx.send(StepEvent { index, outcome }).await {
        match event.outcome {
            Ok(()) => {
                debug!(index, "parallel flow already completed; ignoring late step completion");
            }
            Err(err) => {
                warn!(
                    index,
                    error = %err,
                    "parallel flow already completed; dropping late step error"
                );
            }
        }
    }
}
