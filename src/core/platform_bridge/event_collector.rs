//=========================================================================
// Event Collector
//=========================================================================
//
// Owner-side collector for platform completions with bounded draining.
//
// Architecture:
//   Receiver<PlatformEvent> → collect() → events → CollectStatus
//
// The budget keeps one update from stalling behind a flood of events;
// anything left over is picked up on the next update.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;

//=== CollectStatus =======================================================

/// Channel state after a collection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CollectStatus {
    /// The channel is still connected.
    Open,

    /// Every sender is gone. A `GameService` keeps its own sender, so only
    /// standalone collectors observe this.
    Disconnected,
}

//=== EventCollector ======================================================

/// Drains platform events up to a per-update budget.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    events: Vec<PlatformEvent>,
    budget: usize,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>, budget: usize) -> Self {
        Self {
            receiver,
            events: Vec::with_capacity(budget.min(16)),
            budget,
        }
    }

    /// Collects pending platform events, at most `budget` of them.
    pub(crate) fn collect(&mut self) -> CollectStatus {
        self.events.clear();

        while self.events.len() < self.budget {
            match self.receiver.try_recv() {
                Ok(event) => {
                    trace!(target: "platform", "Received {:?}", event);
                    self.events.push(event);
                }
                Err(TryRecvError::Empty) => return CollectStatus::Open,
                Err(TryRecvError::Disconnected) => return CollectStatus::Disconnected,
            }
        }

        if !self.receiver.is_empty() {
            warn!(
                target: "platform",
                "Event backlog: drained {} events this update, {} still queued",
                self.events.len(),
                self.receiver.len()
            );
        }

        CollectStatus::Open
    }

    /// Takes ownership of the collected events, leaving an empty vec.
    pub(crate) fn take_events(&mut self) -> Vec<PlatformEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns the events collected by the last pass.
    #[cfg(test)]
    pub(crate) fn events(&self) -> &[PlatformEvent] {
        &self.events
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
