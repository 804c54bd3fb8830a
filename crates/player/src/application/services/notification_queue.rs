//! Notification queue
//!
//! Holds at most one visible combat notification. Publishing replaces the
//! current one and restarts the visibility window; the window's timer only
//! hides the notification it was armed for.

use std::future::Future;
use std::time::Duration;

use avengers_domain::CombatNotification;

use crate::infrastructure::scheduler::ScheduledTask;

pub struct NotificationQueue {
    visible: Option<CombatNotification>,
    generation: u64,
    window: Duration,
    hide_timer: ScheduledTask,
}

impl NotificationQueue {
    pub fn new(window: Duration) -> Self {
        Self {
            visible: None,
            generation: 0,
            window,
            hide_timer: ScheduledTask::new(),
        }
    }

    /// Show `notification`, replacing whatever is visible.
    ///
    /// `on_elapsed` builds the task run when the window closes; it receives
    /// the generation to pass back to [`NotificationQueue::expire`].
    /// Returns false, leaving the queue untouched, for suppressed
    /// notifications.
    pub fn publish<F, Fut>(&mut self, notification: CombatNotification, on_elapsed: F) -> bool
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if notification.is_suppressed() {
            tracing::debug!(actor = %notification.actor, "Suppressing notification for unset actor");
            return false;
        }

        self.generation += 1;
        self.visible = Some(notification);
        self.hide_timer.schedule(self.window, on_elapsed(self.generation));
        true
    }

    pub fn currently_visible(&self) -> Option<&CombatNotification> {
        self.visible.as_ref()
    }

    /// Hide the notification published as `generation`.
    ///
    /// Returns false if a newer notification has replaced it since.
    pub fn expire(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.visible.is_none() {
            return false;
        }
        self.visible = None;
        true
    }

    /// Hide immediately and disarm the window timer.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.visible = None;
        self.hide_timer.cancel();
    }
}
