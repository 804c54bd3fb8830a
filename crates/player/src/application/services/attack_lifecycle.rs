//! Attack lifecycle
//!
//! Drives one actor's [`AttackLifecycleState`] and owns the timer that
//! returns it to `Idle`. Every transition bumps a generation counter; a
//! timer only acts if the lifecycle has not moved since it was armed.

use std::future::Future;
use std::time::Duration;

use avengers_domain::{Actor, AttackLifecycleState, DomainError};

use crate::infrastructure::scheduler::ScheduledTask;

pub struct AttackLifecycle {
    actor: Actor,
    state: AttackLifecycleState,
    generation: u64,
    timer: ScheduledTask,
}

impl AttackLifecycle {
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            state: AttackLifecycleState::Idle,
            generation: 0,
            timer: ScheduledTask::new(),
        }
    }

    pub fn actor(&self) -> Actor {
        self.actor
    }

    pub fn state(&self) -> AttackLifecycleState {
        self.state
    }

    fn transition(&mut self, next: AttackLifecycleState) {
        tracing::debug!(actor = %self.actor, from = %self.state, to = %next, "Lifecycle transition");
        self.state = next;
        self.generation += 1;
        self.timer.cancel();
    }

    /// A local attack was issued.
    ///
    /// # Errors
    ///
    /// `InvalidStateTransition` while an attack is already pending.
    pub fn begin_attack(&mut self) -> Result<(), DomainError> {
        let next = self.state.begin_attack()?;
        self.transition(next);
        Ok(())
    }

    /// Revert a pending attack whose request failed. Returns false if the
    /// lifecycle was not pending.
    pub fn abort(&mut self) -> bool {
        self.settle_pending()
    }

    /// Settle a pending attack that was confirmed without damage to this
    /// actor.
    pub fn settle_pending(&mut self) -> bool {
        if !self.state.is_pending() {
            return false;
        }
        self.transition(self.state.settle());
        true
    }

    /// Confirmed damage landed on this actor. Holds `Hit` for `hold`, then
    /// runs the task built by `on_elapsed` with this transition's generation.
    pub fn enter_hit<F, Fut>(&mut self, hold: Duration, on_elapsed: F) -> Result<(), DomainError>
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let next = self.state.receive_damage(self.actor)?;
        self.transition(next);
        self.timer.schedule(hold, on_elapsed(self.generation));
        Ok(())
    }

    /// Give up on a confirmation that has not arrived within `timeout`.
    pub fn arm_pending_timeout<F, Fut>(&mut self, timeout: Duration, on_elapsed: F)
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.state.is_pending() {
            self.timer.schedule(timeout, on_elapsed(self.generation));
        }
    }

    /// Return to `Idle` if nothing has happened since `generation` was
    /// handed out. Called from the lifecycle's own timer task.
    pub fn expire(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.state == AttackLifecycleState::Idle {
            return false;
        }
        tracing::debug!(actor = %self.actor, from = %self.state, "Lifecycle window elapsed");
        self.state = self.state.settle();
        self.generation += 1;
        true
    }

    /// Back to `Idle` with no timer armed.
    pub fn reset(&mut self) {
        self.state = AttackLifecycleState::Idle;
        self.generation += 1;
        self.timer.cancel();
    }
}
