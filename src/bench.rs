// src/bench.rs

//! Micro benchmark of flow overhead.
//!
//! Every case runs three no-op steps per flow, so the numbers measure the
//! cost of dispatching and joining steps rather than any real work.

use std::fmt;
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use tracing::{debug, info};

use crate::context::Context;
use crate::engine::make;
use crate::exec::{BoxTask, task};
use crate::facade::Flw;

/// One benchmarked flow shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchCase {
    Series,
    Parallel,
    MakeSeries,
    MakeParallel,
    Combined,
}

impl BenchCase {
    pub const ALL: [BenchCase; 5] = [
        BenchCase::Series,
        BenchCase::Parallel,
        BenchCase::MakeSeries,
        BenchCase::MakeParallel,
        BenchCase::Combined,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BenchCase::Series => "series",
            BenchCase::Parallel => "parallel",
            BenchCase::MakeSeries => "make_series",
            BenchCase::MakeParallel => "make_parallel",
            BenchCase::Combined => "combined",
        }
    }

    /// Run the case once.
    pub async fn run_once(self, flw: &Flw) -> Result<()> {
        match self {
            BenchCase::Series => {
                flw.series(noop_steps()).run().await?;
            }
            BenchCase::Parallel => {
                flw.parallel(noop_steps()).run().await?;
            }
            BenchCase::MakeSeries => {
                make::series(noop_steps()).call(Context::new()).await?;
            }
            BenchCase::MakeParallel => {
                make::parallel(noop_steps()).call(Context::new()).await?;
            }
            BenchCase::Combined => {
                flw.series([
                    flw.parallel(noop_steps()).into_task(),
                    flw.series(noop_steps()).into_task(),
                ])
                .run()
                .await?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for BenchCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Timing of one case over one round.
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub case: BenchCase,
    pub round: usize,
    pub iterations: usize,
    pub elapsed: Duration,
}

impl BenchReport {
    pub fn per_flow(&self) -> Duration {
        if self.iterations == 0 {
            return Duration::ZERO;
        }
        self.elapsed / u32::try_from(self.iterations).unwrap_or(u32::MAX)
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "round {} {:<14} {:>8} flows in {:.3?} ({:?}/flow)",
            self.round,
            self.case.name(),
            self.iterations,
            self.elapsed,
            self.per_flow()
        )
    }
}

fn noop_steps() -> [BoxTask; 3] {
    [noop(), noop(), noop()]
}

fn noop() -> BoxTask {
    task(|_ctx: Context| async { Ok(()) })
}

/// Run `case` `iterations` times and time it.
pub async fn run_case(
    flw: &Flw,
    case: BenchCase,
    round: usize,
    iterations: usize,
) -> Result<BenchReport> {
    let start = Instant::now();
    for i in 0..iterations {
        case.run_once(flw)
            .await
            .with_context(|| format!("bench case '{case}' failed at iteration {i}"))?;
    }
    let report = BenchReport {
        case,
        round,
        iterations,
        elapsed: start.elapsed(),
    };
    debug!(%report, "bench case finished");
    Ok(report)
}

/// Run every case `rounds` times.
pub async fn run_all(flw: &Flw, iterations: usize, rounds: usize) -> Result<Vec<BenchReport>> {
    info!(iterations, rounds, "running benchmark");
    let mut reports = Vec::with_capacity(rounds.saturating_mul(BenchCase::ALL.len()));
    for round in 1..=rounds {
        for case in BenchCase::ALL {
            reports.push(run_case(flw, case, round, iterations).await?);
        }
    }
    Ok(reports)
}
