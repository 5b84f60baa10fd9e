//! Wall clock mapped onto SimTime

use std::time::Instant;

use eve_core::SimTime;

/// Monotonic clock anchored at page load
/// INVARIANT: `now()` never decreases
#[derive(Clone, Copy, Debug)]
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        WallClock {
            origin: Instant::now(),
        }
    }

    /// Time since the clock was created
    pub fn now(&self) -> SimTime {
        SimTime::from_millis(self.origin.elapsed().as_millis() as u64)
    }

    /// Real instant corresponding to a SimTime on this clock
    pub fn instant_at(&self, t: SimTime) -> Instant {
        self.origin + std::time::Duration::from_millis(t.as_millis())
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_wall_clock_monotonic() {
        let clock = WallClock::new();

        let t1 = clock.now();
        std::thread::sleep(Duration::from_millis(10));
        let t2 = clock.now();

        assert!(t2 > t1);
        assert_eq!(clock.instant_at(SimTime::ZERO), clock.origin);
    }
}
