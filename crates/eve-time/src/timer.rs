//! Timer tokens and the scheduler seam

use std::fmt;
use std::time::Duration;

use eve_core::SimTime;

/// What a timer is for. At most one timer of each kind is outstanding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    /// Curtain transition before the caption is revealed
    Reveal,
    /// Caption reading delay before media playback
    Read,
    /// Hero persona rotation while the visitor has not chosen
    AutoRotate,
}

/// Handle to one scheduled timer
///
/// The generation is unique per issuer, so an expiry delivered after its
/// timer was replaced can be recognised and dropped.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken {
    pub kind: TimerKind,
    pub generation: u64,
}

impl fmt::Debug for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.kind, self.generation)
    }
}

/// Issues timer tokens with increasing generations
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimerIssuer {
    next_generation: u64,
}

impl TimerIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, kind: TimerKind) -> TimerToken {
        self.next_generation += 1;
        TimerToken {
            kind,
            generation: self.next_generation,
        }
    }
}

/// Arms and cancels timers on behalf of a controller.
///
/// Expiries are not delivered through this trait; the event loop that owns
/// the scheduler hands expired tokens back to the controller.
pub trait Scheduler {
    /// Current time as seen by this scheduler
    fn now(&self) -> SimTime;

    /// Arm `token` to expire after `delay`
    fn schedule(&mut self, token: TimerToken, delay: Duration);

    /// Disarm `token`. Unknown or already expired tokens are ignored.
    fn cancel(&mut self, token: TimerToken);
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn now(&self) -> SimTime {
        (**self).now()
    }

    fn schedule(&mut self, token: TimerToken, delay: Duration) {
        (**self).schedule(token, delay)
    }

    fn cancel(&mut self, token: TimerToken) {
        (**self).cancel(token)
    }
}
