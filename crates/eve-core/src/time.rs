//! Virtual time
//!
//! Sequencing delays are measured against a SimTime rather than the OS
//! clock so the same timer code runs under a simulated clock in tests and a
//! wall clock in the demo. Represented as milliseconds since page load.

use std::ops::{Add, Sub};
use std::time::Duration;

/// Milliseconds since page load
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    #[inline]
    pub fn from_millis(millis: u64) -> Self {
        SimTime(millis)
    }

    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        SimTime((secs * 1000.0) as u64)
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        SimTime(self.0.saturating_add(duration.as_millis() as u64))
    }

    /// Duration elapsed since `earlier`, zero if `earlier` is in the future
    #[inline]
    pub fn saturating_since(self, earlier: SimTime) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for SimTime {
    type Output = SimTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub<SimTime> for SimTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: SimTime) -> Self::Output {
        self.saturating_since(rhs)
    }
}

impl std::fmt::Debug for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t({}ms)", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_and_diff() {
        let t = SimTime::from_millis(500) + Duration::from_millis(1000);
        assert_eq!(t.as_millis(), 1500);
        assert_eq!(t - SimTime::from_millis(500), Duration::from_millis(1000));
        assert_eq!(SimTime::ZERO - t, Duration::ZERO);
    }

    #[test]
    fn test_saturates_at_max() {
        let t = SimTime(u64::MAX - 1) + Duration::from_millis(10);
        assert_eq!(t, SimTime(u64::MAX));
    }

    proptest! {
        #[test]
        fn prop_add_is_monotonic(start in 0u64..1_000_000_000, delay in 0u64..100_000) {
            let t = SimTime::from_millis(start);
            let later = t + Duration::from_millis(delay);
            prop_assert!(later >= t);
            prop_assert_eq!(later - t, Duration::from_millis(delay));
        }
    }
}
