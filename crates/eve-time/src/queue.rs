//! Deterministic timer queue
//!
//! Simulated clock for tests and replays. Time only moves when the owner
//! pops due timers or advances it explicitly. Timers with equal deadlines
//! fire in the order they were scheduled.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use eve_core::SimTime;

use crate::{Scheduler, TimerToken};

/// Ordering key: deadline, then insertion sequence
type Slot = (SimTime, u64);

/// Timer queue over virtual time
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: SimTime,
    pending: BTreeMap<Slot, TimerToken>,
    slots: HashMap<TimerToken, Slot>,
    seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at a specific time
    pub fn starting_at(now: SimTime) -> Self {
        TimerQueue {
            now,
            ..Self::default()
        }
    }

    /// Number of armed timers
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_armed(&self, token: TimerToken) -> bool {
        self.slots.contains_key(&token)
    }

    /// Armed tokens in firing order
    pub fn armed(&self) -> Vec<TimerToken> {
        self.pending.values().copied().collect()
    }

    /// Earliest deadline, if any timer is armed
    pub fn next_deadline(&self) -> Option<SimTime> {
        self.pending.keys().next().map(|(at, _)| *at)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline. Returns None once nothing else is due.
    pub fn pop_due(&mut self, until: SimTime) -> Option<(SimTime, TimerToken)> {
        let (&slot, _) = self.pending.iter().next()?;
        if slot.0 > until {
            return None;
        }
        let token = self.pending.remove(&slot)?;
        self.slots.remove(&token);
        if slot.0 > self.now {
            self.now = slot.0;
        }
        Some((slot.0, token))
    }

    /// Move the clock forward without firing anything.
    /// Never moves backwards.
    pub fn set_now(&mut self, now: SimTime) {
        if now > self.now {
            self.now = now;
        }
    }
}

impl Scheduler for TimerQueue {
    fn now(&self) -> SimTime {
        self.now
    }

    fn schedule(&mut self, token: TimerToken, delay: Duration) {
        // Re-arming a live token replaces its deadline
        self.cancel(token);

        self.seq += 1;
        let slot = (self.now + delay, self.seq);
        self.pending.insert(slot, token);
        self.slots.insert(token, slot);
        tracing::trace!(?token, deadline = ?slot.0, "timer armed");
    }

    fn cancel(&mut self, token: TimerToken) {
        if let Some(slot) = self.slots.remove(&token) {
            self.pending.remove(&slot);
            tracing::trace!(?token, "timer cancelled");
        }
    }
}
