// src/engine/series.rs

//! Sequential executor.

use std::sync::Arc;

use tracing::{debug, info};

use crate::context::Context;
use crate::errors::{FlwError, Result};
use crate::exec::{BoxTask, TaskRunner};
use crate::types::FlowKind;

/// Run `tasks` one after the other against `ctx`.
///
/// - The stop reason is checked before every step; once set, the remaining
///   steps are skipped and the run still succeeds.
/// - Step N+1 is dispatched only after step N reported back.
/// - The first failing step ends the run; later steps never start.
pub(crate) async fn run_series(
    tasks: &[BoxTask],
    ctx: &Context,
    runner: &dyn TaskRunner,
) -> Result<()> {
    let total = tasks.len();

    for (index, task) in tasks.iter().enumerate() {
        if let Some(reason) = ctx.stopped() {
            info!(
                %reason,
                index,
                skipped = total - index,
                "series stopped; skipping remaining steps"
            );
            return Ok(());
        }

        debug!(index, total, "series: dispatching step");
        let handle = runner.dispatch(Arc::clone(task), ctx.clone());

        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(source)) => {
                debug!(index, error = %source, "series step failed; halting");
                return Err(FlwError::TaskFailed {
                    kind: FlowKind::Series,
                    index,
                    source,
                });
            }
            Err(join_err) => {
                return Err(FlwError::from_join(FlowKind::Series, index, join_err));
            }
        }
    }

    Ok(())
}
