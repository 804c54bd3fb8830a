//! Cancellable delayed tasks.
//!
//! A `ScheduledTask` owns at most one pending timer. Scheduling again
//! replaces (aborts) the previous timer, and dropping the owner aborts
//! whatever is still pending, so timers never outlive the state they reset.

use std::future::Future;
use std::time::Duration;

use tokio::task::AbortHandle;

#[derive(Debug, Default)]
pub struct ScheduledTask {
    handle: Option<AbortHandle>,
}

impl ScheduledTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay`, replacing any previously scheduled task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        self.handle = Some(handle.abort_handle());
    }

    /// Abort the pending task, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// True while a task is scheduled and has not finished.
    pub fn is_scheduled(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
