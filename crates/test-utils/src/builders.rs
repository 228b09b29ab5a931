#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use serde_json::Value;
use flw::config::{ConfigFile, RawConfigFile};
use flw::{task, BoxTask, Context};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn failure_policy(mut self, policy: &str) -> Self {
        self.config.flow.failure_policy = policy.to_string();
        self
    }

    pub fn each_limit(mut self, limit: usize) -> Self {
        self.config.each.limit = limit;
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.log.level = Some(level.to_string());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Step that does nothing.
pub fn noop() -> BoxTask {
    task(|_ctx: Context| async { Ok(()) })
}

/// Step that writes `value` under `key`.
pub fn set_value(key: &str, value: impl Into<Value>) -> BoxTask {
    let key = key.to_string();
    let value = value.into();
    task(move |ctx: Context| {
        ctx.set(key.clone(), value.clone());
        async { Ok(()) }
    })
}

/// Step that sleeps for `ms` milliseconds, then writes `value` under `key`.
pub fn delayed_set(key: &str, value: impl Into<Value>, ms: u64) -> BoxTask {
    let key = key.to_string();
    let value = value.into();
    task(move |ctx: Context| {
        let key = key.clone();
        let value = value.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            ctx.set(key, value);
            Ok(())
        }
    })
}

/// Step that fails with `message`.
pub fn fail_with(message: &str) -> BoxTask {
    let message = message.to_string();
    task(move |_ctx: Context| {
        let message = message.clone();
        async move { Err(anyhow!(message)) }
    })
}

/// Step that sleeps for `ms` milliseconds, then fails with `message`.
pub fn delayed_fail(message: &str, ms: u64) -> BoxTask {
    let message = message.to_string();
    task(move |_ctx: Context| {
        let message = message.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Err(anyhow!(message))
        }
    })
}

/// Step that panics with `message`.
#[allow(unreachable_code)]
pub fn panicking(message: &'static str) -> BoxTask {
    task(move |_ctx: Context| async move {
        panic!("{message}");
        Ok(())
    })
}

/// Step that stops the flow, with the default reason when `reason` is `None`.
pub fn stop_with(reason: Option<&str>) -> BoxTask {
    let reason = reason.map(str::to_string);
    task(move |ctx: Context| {
        match reason.as_deref() {
            Some(reason) => ctx.stop_with(reason),
            None => ctx.stop(),
        }
        async { Ok(()) }
    })
}

/// Ordered record of what steps did, shared between steps and the test.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Step that logs `start:<label>`, yields to the runtime a few times,
    /// then logs `end:<label>`.
    pub fn step(&self, label: &str) -> BoxTask {
        let log = self.clone();
        let label = label.to_string();
        task(move |_ctx: Context| {
            let log = log.clone();
            let label = label.clone();
            async move {
                log.push(format!("start:{label}"));
                for _ in 0..3 {
                    tokio::task::yield_now().await;
                }
                log.push(format!("end:{label}"));
                Ok(())
            }
        })
    }
}

/// Tracks how many calls are in flight at once.
#[derive(Debug, Clone, Default)]
pub struct ConcurrencyProbe {
    current: Arc<AtomicUsize>,
    max: Arc<AtomicUsize>,
}

impl ConcurrencyProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(now, Ordering::SeqCst);
    }

    pub fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn max(&self) -> usize {
        self.max.load(Ordering::SeqCst)
    }
}
