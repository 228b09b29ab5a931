// src/context/control.rs

//! Helpers a task uses to talk to its flow: stop, store, clean.

use serde_json::Value;
use tracing::debug;

use super::{Context, ContextData};
use crate::types::ContextKey;

/// Reason recorded by [`Context::stop`] when none is given.
pub const DEFAULT_STOP_REASON: &str = "stopped";

impl Context {
    /// Ask the enclosing sequential flow to skip its remaining steps.
    ///
    /// The flow still completes successfully. Parallel flows ignore the
    /// signal, but their steps may poll [`Context::is_stopped`].
    pub fn stop(&self) {
        self.stop_with(DEFAULT_STOP_REASON);
    }

    /// Like [`Context::stop`] with an explicit reason.
    pub fn stop_with(&self, reason: impl Into<String>) {
        let reason = reason.into();
        debug!(%reason, "flow stop requested");
        self.lock().control.stopped = Some(reason);
    }

    /// The stop reason, if a step stopped the flow.
    pub fn stopped(&self) -> Option<String> {
        self.lock().control.stopped.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.lock().control.stopped.is_some()
    }

    /// Completion callback that stores a successful result under `key`.
    ///
    /// Errors are forwarded unchanged and nothing is written. Handy when an
    /// API reports through a callback:
    ///
    /// ```ignore
    /// let done = ctx.store("user");
    /// done(fetch_user(id).await)
    /// ```
    pub fn store<V, E>(
        &self,
        key: &str,
    ) -> impl FnOnce(Result<V, E>) -> anyhow::Result<()> + Send + use<V, E>
    where
        V: Into<Value>,
        E: Into<anyhow::Error>,
    {
        let ctx = self.clone();
        let key = key.to_string();
        move |result| ctx.store_result(key, result)
    }

    /// Store `result` under `key` on success, forward its error otherwise.
    pub fn store_result<V, E>(
        &self,
        key: impl Into<ContextKey>,
        result: Result<V, E>,
    ) -> anyhow::Result<()>
    where
        V: Into<Value>,
        E: Into<anyhow::Error>,
    {
        let data = result.map_err(Into::into)?;
        self.set(key, data);
        Ok(())
    }

    /// Copy of the user data, without any flow bookkeeping.
    pub fn clean(&self) -> ContextData {
        self.lock().data.clone()
    }
}
