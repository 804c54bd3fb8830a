//! Testability ports for injecting time and randomness.

use chrono::{DateTime, Utc};

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform index in `[0, upper)`. `upper` is always at least 1.
    fn gen_index(&self, upper: usize) -> usize;
}
