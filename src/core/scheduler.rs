//=========================================================================
// Scheduler
//=========================================================================
//
// One-shot delayed tasks polled from the owner's update loop.
//
// Nothing runs in the background: the owner passes the current time to
// `poll()` and acts when the task reports it is due.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

//=== TaskState ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskState {
    Scheduled(Instant),
    Fired,
    Cancelled,
}

//=== DelayedTask =========================================================

/// A one-shot timer with explicit cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayedTask {
    state: TaskState,
}

impl DelayedTask {
    /// Schedules the task `delay` after `now`.
    ///
    /// A due time past the clock's range never arrives, so the task is
    /// returned idle.
    pub fn after(now: Instant, delay: Duration) -> Self {
        match now.checked_add(delay) {
            Some(due) => Self {
                state: TaskState::Scheduled(due),
            },
            None => Self::idle(),
        }
    }

    /// A task that never fires.
    pub fn idle() -> Self {
        Self {
            state: TaskState::Cancelled,
        }
    }

    /// Returns `true` exactly once, the first time `now` reaches the due time.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.state {
            TaskState::Scheduled(due) if now >= due => {
                self.state = TaskState::Fired;
                true
            }
            _ => false,
        }
    }

    /// Cancels the task if it has not fired yet.
    ///
    /// Returns `true` if a scheduled task was cancelled.
    pub fn cancel(&mut self) -> bool {
        if let TaskState::Scheduled(_) = self.state {
            self.state = TaskState::Cancelled;
            true
        } else {
            false
        }
    }

    /// Returns true while the task is waiting to fire.
    pub fn is_scheduled(&self) -> bool {
        matches!(self.state, TaskState::Scheduled(_))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
