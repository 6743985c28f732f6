//! Deterministic callback scheduler.
//!
//! All timing in a session runs on one virtual clock. The host moves the
//! clock forward and due callbacks come back out in (due time, scheduling
//! order) order, one at a time, so each is applied atomically before the next.
//!
//! Every entry records the session generation it was scheduled under. The
//! scheduler doesn't interpret it; the session compares it on dispatch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rules::PendingPair;

/// Handle to a scheduled callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

impl TimerId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

/// What a callback does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Preview window is over; hide the cards and start play.
    PreviewEnd,
    /// One round-timer period elapsed.
    Tick,
    /// Apply the delayed match/mismatch of a pair.
    Resolve(PendingPair),
}

/// A callback that has come due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    /// Clock time the callback was due at.
    pub at_ms: u64,
    /// Generation captured when it was scheduled.
    pub generation: u64,
    pub event: TimerEvent,
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    generation: u64,
    event: TimerEvent,
}

/// Virtual clock plus the queue of outstanding callbacks.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    /// Keyed by (due time, id); ids increase, so ties fire in scheduling order.
    queue: BTreeMap<(u64, TimerId), Scheduled>,
}

impl Scheduler {
    /// Create a scheduler with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `event` to fire `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, generation: u64, event: TimerEvent) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now_ms.saturating_add(delay_ms);
        self.queue.insert((due, id), Scheduled { generation, event });
        id
    }

    /// Cancel one callback. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.queue.keys().find(|(_, queued)| *queued == id).copied();
        match key {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    /// Cancel every outstanding callback. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    /// Number of outstanding callbacks.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Due time of the earliest outstanding callback.
    #[must_use]
    pub fn next_due_ms(&self) -> Option<u64> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Remove and return the earliest callback due at or before `until_ms`,
    /// moving the clock to its due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired> {
        let (&(due, id), _) = self.queue.iter().next()?;
        if due > until_ms {
            return None;
        }
        let scheduled = self.queue.remove(&(due, id))?;
        self.now_ms = self.now_ms.max(due);
        Some(Fired {
            id,
            at_ms: due,
            generation: scheduled.generation,
            event: scheduled.event,
        })
    }

    /// Move the clock forward to `to_ms` without firing anything.
    pub fn advance_clock(&mut self, to_ms: u64) {
        self.now_ms = self.now_ms.max(to_ms);
    }
}
