// src/iter/n.rs

use std::future::Future;
use std::sync::Arc;

use tracing::trace;

use super::item_outcome;
use crate::errors::Result;

/// Call `f(0)`, `f(1)`, ..., `f(count - 1)` one at a time and collect the
/// results in index order.
///
/// Stops at the first failing index.
pub async fn n<R, F, Fut>(count: usize, f: F) -> Result<Vec<R>>
where
    R: Send + 'static,
    F: Fn(usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
{
    let f = Arc::new(f);
    let mut results = Vec::new();

    for index in 0..count {
        trace!(index, count, "n: dispatching");
        let f = Arc::clone(&f);
        let handle = tokio::spawn(async move { f(index).await });
        results.push(item_outcome(index, handle.await)?);
    }

    Ok(results)
}
