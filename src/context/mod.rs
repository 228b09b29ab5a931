// src/context/mod.rs

//! Shared flow state.
//!
//! A [`Context`] is created once per flow invocation (or handed in by the
//! caller) and threaded through every step, including nested flows. It is a
//! cheap handle: cloning it shares the same underlying state.
//!
//! The state is split in two so user keys can never collide with flow
//! bookkeeping:
//! - `data`: the open-ended key/value map tasks read and write.
//! - `control`: the stop reason observed by sequential flows.
//!
//! The helpers tasks use to talk to the flow (`stop`, `store`, `clean`) live
//! in [`control`].

pub mod control;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::Result;
use crate::types::ContextKey;

pub use control::DEFAULT_STOP_REASON;

/// User data held by a context.
pub type ContextData = BTreeMap<ContextKey, Value>;

#[derive(Debug, Default)]
struct ControlState {
    stopped: Option<String>,
}

#[derive(Debug, Default)]
struct ContextState {
    data: ContextData,
    control: ControlState,
}

/// Handle to the state shared by every step of one flow invocation.
#[derive(Clone, Default)]
pub struct Context {
    inner: Arc<Mutex<ContextState>>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Context")
            .field("data", &state.data)
            .field("stopped", &state.control.stopped)
            .finish()
    }
}

impl From<ContextData> for Context {
    fn from(data: ContextData) -> Self {
        Self::from_data(data)
    }
}

impl Context {
    /// Empty context with no stop reason.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context seeded with existing user data.
    pub fn from_data(data: ContextData) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ContextState {
                data,
                control: ControlState::default(),
            })),
        }
    }

    /// Reuse `existing` as-is or allocate a fresh context.
    ///
    /// The returned handle shares state with `existing`; nothing is copied.
    pub fn ensure(existing: Option<Context>) -> Context {
        existing.unwrap_or_default()
    }

    /// Whether both handles point at the same state.
    pub fn ptr_eq(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().data.get(key).cloned()
    }

    /// Deserialize the value under `key`.
    ///
    /// Returns `None` when the key is missing or holds an incompatible value.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        serde_json::from_value(value).ok()
    }

    /// Set `key`, returning the previous value.
    pub fn set(&self, key: impl Into<ContextKey>, value: impl Into<Value>) -> Option<Value> {
        self.lock().data.insert(key.into(), value.into())
    }

    /// Serialize `value` and store it under `key`.
    pub fn set_serialized<T: Serialize>(&self, key: impl Into<ContextKey>, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(anyhow::Error::from)?;
        self.set(key, value);
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.lock().data.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().data.is_empty()
    }

    pub fn keys(&self) -> Vec<ContextKey> {
        self.lock().data.keys().cloned().collect()
    }

    /// Run `f` with exclusive access to the user data.
    ///
    /// Use this for read-modify-write updates from concurrent steps. `f` must
    /// not block or await.
    ///
    /// `f` runs while the context lock is held. Calling any method on the same
    /// context from inside `f` deadlocks; work on the `&mut ContextData` only.
    pub fn update<R>(&self, f: impl FnOnce(&mut ContextData) -> R) -> R {
        f(&mut self.lock().data)
    }

    fn lock(&self) -> MutexGuard<'_, ContextState> {
        // A panicking step cannot leave the map half-written, so a poisoned
        // lock is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
