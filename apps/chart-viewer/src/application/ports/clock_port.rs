//! Clock Port (Driven Port)
//!
//! Source of "today" for input defaults and the intraday clamp.

use chrono::{Local, NaiveDate};

/// Port for reading the current date.
pub trait ClockPort: Send + Sync {
    /// Today's date in the host's local time zone.
    fn today(&self) -> NaiveDate;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a date, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl ClockPort for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
