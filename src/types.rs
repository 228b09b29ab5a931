use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Key under which a value lives in a [`Context`](crate::context::Context).
pub type ContextKey = String;

/// Execution strategy of a flow.
///
/// - `Series`: one step at a time, in list order, honouring the stop signal.
/// - `Parallel`: every step dispatched at once, completion counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Series,
    Parallel,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowKind::Series => f.write_str("series"),
            FlowKind::Parallel => f.write_str("parallel"),
        }
    }
}

/// What a parallel flow does when one of its steps fails.
///
/// - `FirstError`: complete with the first error to arrive. Steps still in
///   flight keep running; their outcomes are logged and dropped.
/// - `CollectAll`: wait for every step and report all failures together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    FirstError,
    CollectAll,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::FirstError
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "first_error" | "first" => Ok(FailurePolicy::FirstError),
            "collect_all" | "all" => Ok(FailurePolicy::CollectAll),
            other => Err(format!(
                "invalid failure_policy: {other} (expected \"first_error\" or \"collect_all\")"
            )),
        }
    }
}
