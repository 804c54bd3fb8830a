//! Clock and random implementations.

use chrono::{DateTime, Utc};

use crate::ports::outbound::{ClockPort, RandomPort};

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_index(&self, upper: usize) -> usize {
        use rand::Rng;
        rand::thread_rng().gen_range(0..upper.max(1))
    }
}

/// Fixed clock for testing.
#[cfg(any(test, feature = "testing"))]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(any(test, feature = "testing"))]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed random for testing.
///
/// Always answers the same index, clamped into the requested range.
#[cfg(any(test, feature = "testing"))]
pub struct FixedRandom(pub usize);

#[cfg(any(test, feature = "testing"))]
impl RandomPort for FixedRandom {
    fn gen_index(&self, upper: usize) -> usize {
        self.0.min(upper.saturating_sub(1))
    }
}
