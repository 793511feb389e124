//! Time sources for channels

use std::fmt;

use chrono::{DateTime, FixedOffset, Local};

/// Source of the current instant used for file names, dates and times
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current instant in the clock's time zone
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        DateTime::<FixedOffset>::from(Local::now())
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    /// Create a clock that always reports `instant`
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
