//! Wall-clock time source.
//!
//! The deviation computation and the date-stamping of schedule times
//! both depend on "now". Putting the clock behind a trait keeps the
//! tracker deterministic in tests.

use chrono::{NaiveDate, NaiveDateTime};

/// A source of local wall-clock time.
pub trait Clock: Send + Sync {
    /// The current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Today's calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
