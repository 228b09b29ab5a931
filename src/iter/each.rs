// src/iter/each.rs

use std::future::Future;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tracing::debug;

use super::item_outcome;
use crate::errors::{FlwError, Result};

/// Concurrency used by [`each`].
pub const DEFAULT_EACH_LIMIT: usize = 3;

struct ItemEvent<R> {
    index: usize,
    outcome: Result<R>,
}

/// [`each_limit`] with [`DEFAULT_EACH_LIMIT`].
pub async fn each<I, T, R, F, Fut>(items: I, f: F) -> Result<Vec<R>>
where
    I: IntoIterator<Item = T>,
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
{
    each_limit(items, DEFAULT_EACH_LIMIT, f).await
}

/// [`each_limit`] with a limit of 1: items are processed one at a time.
pub async fn each_series<I, T, R, F, Fut>(items: I, f: F) -> Result<Vec<R>>
where
    I: IntoIterator<Item = T>,
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
{
    each_limit(items, 1, f).await
}

/// Call `f` for every item with at most `limit` calls in flight.
///
/// `limit == 0` is treated as 1. Results come back in input order no matter
/// which call finishes first. The first failing item completes the whole
/// call with [`FlwError::ItemFailed`]; no further items are started, and
/// items already in flight finish in the background.
pub async fn each_limit<I, T, R, F, Fut>(items: I, limit: usize, f: F) -> Result<Vec<R>>
where
    I: IntoIterator<Item = T>,
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
{
    let limit = limit.max(1);
    let items: Vec<T> = items.into_iter().collect();
    let total = items.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let f = Arc::new(f);
    let (tx, mut rx) = mpsc::channel::<ItemEvent<R>>(total);
    let mut pending = items.into_iter().enumerate();
    let mut results: Vec<Option<R>> = std::iter::repeat_with(|| None).take(total).collect();
    let mut in_flight = 0usize;
    let mut finished = 0usize;

    debug!(total, limit, "each: starting");

    while finished < total {
        while in_flight < limit {
            let Some((index, item)) = pending.next() else {
                break;
            };
            spawn_item(index, item, Arc::clone(&f), tx.clone());
            in_flight += 1;
        }

        let Some(event) = rx.recv().await else {
            return Err(FlwError::Other(anyhow!(
                "each lost {} of {total} item outcomes",
                total - finished
            )));
        };
        in_flight -= 1;
        finished += 1;

        match event.outcome {
            Ok(value) => results[event.index] = Some(value),
            Err(err) => {
                debug!(index = event.index, "each: item failed; completing with error");
                return Err(err);
            }
        }
    }

    Ok(results.into_iter().flatten().collect())
}

fn spawn_item<T, R, F, Fut>(index: usize, item: T, f: Arc<F>, tx: mpsc::Sender<ItemEvent<R>>)
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
{
    let handle = tokio::spawn(async move { f(item).await });
    tokio::spawn(async move {
        let outcome = item_outcome(index, handle.await);
        if tx.send(ItemEvent { index, outcome }).await.is_err() {
            debug!(index, "each already completed; dropping late item outcome");
        }
    });
}
