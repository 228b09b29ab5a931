// src/lib.rs

//! Small async control-flow helpers.
//!
//! Run a list of steps over one shared [`Context`], either one after the
//! other ([`series`]) or all at once ([`parallel`]), and get a single
//! outcome back. Flows are steps themselves, so they nest into trees:
//!
//! ```ignore
//! use flw::{make, series, task, Context};
//!
//! let output = series([
//!     make::parallel([fetch_user, fetch_settings]),
//!     task(|ctx: Context| async move {
//!         ctx.set("ready", true);
//!         Ok(())
//!     }),
//! ])
//! .run()
//! .await?;
//! ```
//!
//! Around the two executors sit a few conveniences: [`wrap`] adapters for
//! plain async functions, bounded [`each`] / [`each_series`] and the index
//! iterator [`n`], and the configured [`Flw`] entry point.

pub mod bench;
pub mod cli;
pub mod config;
pub mod context;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod facade;
pub mod iter;
pub mod logging;
pub mod types;

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

pub use context::{Context, ContextData, DEFAULT_STOP_REASON};
pub use engine::{Flow, FlowOutput, make, parallel, series};
pub use errors::FlwError;
pub use exec::{BoxTask, Task, TaskRunner, TokioRunner, task, wrap, wrap_into, wrap_with};
pub use facade::Flw;
pub use iter::{DEFAULT_EACH_LIMIT, each, each_limit, each_series, n};
pub use types::{FailurePolicy, FlowKind};

use crate::bench::BenchCase;
use crate::cli::CliArgs;
use crate::config::ConfigFile;

/// Load the configuration the benchmark binary should use.
pub fn load_config(args: &CliArgs) -> errors::Result<ConfigFile> {
    config::load_or_default(args.config.as_deref().map(Path::new))
}

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs, cfg: ConfigFile) -> Result<()> {
    if args.dry_run {
        print_dry_run(&args, &cfg);
        return Ok(());
    }

    let flw = Flw::new(&cfg);
    info!(?flw, "starting benchmark");

    let reports = bench::run_all(&flw, args.iterations, args.rounds).await?;
    for report in &reports {
        println!("{report}");
    }

    Ok(())
}

fn print_dry_run(args: &CliArgs, cfg: &ConfigFile) {
    println!("flw-bench dry-run");
    println!("  flow.failure_policy = {:?}", cfg.failure_policy);
    println!("  each.limit = {}", cfg.each_limit);
    if let Some(level) = cfg.log_level {
        println!("  log.level = {level:?}");
    }
    println!("  iterations = {}", args.iterations);
    println!("  rounds = {}", args.rounds);
    println!();

    println!("cases ({}):", BenchCase::ALL.len());
    for case in BenchCase::ALL {
        println!("  - {case}");
    }

    debug!("dry-run complete (no execution)");
}
