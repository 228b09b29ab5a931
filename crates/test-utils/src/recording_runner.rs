use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use flw::exec::{StepHandle, TaskRunner, TokioRunner};
use flw::{BoxTask, Context};

/// A runner that:
/// - counts every dispatched step
/// - delegates the actual scheduling to `TokioRunner`.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    dispatched: Arc<AtomicUsize>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }

    pub fn shared(&self) -> Arc<dyn TaskRunner> {
        Arc::new(self.clone())
    }
}

impl TaskRunner for RecordingRunner {
    fn dispatch(&self, task: BoxTask, ctx: Context) -> StepHandle {
        self.dispatched.fetch_add(1, Ordering::SeqCst);
        TokioRunner.dispatch(task, ctx)
    }
}
