// src/exec/wrap.rs

//! Adapters turning ordinary async functions into flow steps.

use std::future::Future;

use serde_json::Value;

use crate::context::Context;
use crate::exec::task::{BoxTask, task};

/// Run `f` as a step and discard its result.
pub fn wrap<F, Fut, V>(f: F) -> BoxTask
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    V: Send + 'static,
{
    task(move |_ctx: Context| {
        let fut = f();
        async move { fut.await.map(|_| ()) }
    })
}

/// Run `f` as a step and store its result in the context under `key`.
pub fn wrap_into<F, Fut, V>(f: F, key: &str) -> BoxTask
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    V: Into<Value> + Send + 'static,
{
    wrap_with(move |()| f(), (), Some(key))
}

/// Run `f(args)` as a step, optionally storing the result under `key`.
///
/// `args` is cloned for every invocation so the step can run more than once.
pub fn wrap_with<F, Fut, A, V>(f: F, args: A, key: Option<&str>) -> BoxTask
where
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    A: Clone + Send + Sync + 'static,
    V: Into<Value> + Send + 'static,
{
    let key = key.map(str::to_string);
    task(move |ctx: Context| {
        let fut = f(args.clone());
        let key = key.clone();
        async move {
            let result = fut.await;
            match key {
                Some(key) => ctx.store_result(key, result),
                None => result.map(|_| ()),
            }
        }
    })
}
