//! Time-of-day handling for the timetable.
//!
//! The timetable document gives times as zero-padded "HH:MM" strings with
//! no date component. This module provides a validated time-of-day type
//! whose ordering coincides with lexicographic ordering of the string
//! form, which is what the query operations rely on when filtering and
//! sorting by time.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day in a timetable, minute precision.
///
/// Ordering is chronological within a single day, which for zero-padded
/// "HH:MM" strings is the same as lexicographic string ordering.
///
/// # Examples
///
/// ```
/// use shuttle_tracker::domain::DayTime;
///
/// let dep = DayTime::parse("05:32").unwrap();
/// assert_eq!(dep.to_string(), "05:32");
/// assert!(dep > DayTime::parse("00:00").unwrap());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayTime {
    time: NaiveTime,
}

impl DayTime {
    /// Midnight, the default lower bound for "departures after" queries.
    pub const MIDNIGHT: DayTime = DayTime {
        time: NaiveTime::MIN,
    };

    /// Parse a time from zero-padded "HH:MM" format.
    ///
    /// # Examples
    ///
    /// ```
    /// use shuttle_tracker::domain::DayTime;
    ///
    /// assert!(DayTime::parse("00:00").is_ok());
    /// assert!(DayTime::parse("23:59").is_ok());
    ///
    /// // Invalid formats
    /// assert!(DayTime::parse("530").is_err());
    /// assert!(DayTime::parse("5:30").is_err());
    /// assert!(DayTime::parse("24:00").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        // Must be exactly 5 characters: HH:MM
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();

        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| TimeError::new("invalid time"))?;

        Ok(Self { time })
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    /// Stamp this time of day onto a calendar date.
    ///
    /// The tracker uses this to turn schedule times into full timestamps
    /// using the current calendar date. Services that cross midnight get
    /// the wrong date on their post-midnight times; that limitation is
    /// inherited from the source data model, which carries no dates.
    pub fn at_date(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.time)
    }
}

impl fmt::Debug for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DayTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        let t = DayTime::parse("00:00").unwrap();
        assert_eq!(t.hour(), 0);
        assert_eq!(t.minute(), 0);

        let t = DayTime::parse("23:59").unwrap();
        assert_eq!(t.hour(), 23);
        assert_eq!(t.minute(), 59);

        let t = DayTime::parse("05:32").unwrap();
        assert_eq!(t.hour(), 5);
        assert_eq!(t.minute(), 32);
    }

    #[test]
    fn parse_invalid_format() {
        // Wrong length
        assert!(DayTime::parse("0530").is_err());
        assert!(DayTime::parse("5:30").is_err());
        assert!(DayTime::parse("05:300").is_err());
        assert!(DayTime::parse("").is_err());

        // Missing colon
        assert!(DayTime::parse("05-30").is_err());
        assert!(DayTime::parse("05.30").is_err());

        // Non-digit characters
        assert!(DayTime::parse("ab:cd").is_err());
        assert!(DayTime::parse("0a:30").is_err());
    }

    #[test]
    fn parse_invalid_values() {
        assert!(DayTime::parse("24:00").is_err());
        assert!(DayTime::parse("99:00").is_err());
        assert!(DayTime::parse("12:60").is_err());
        assert!(DayTime::parse("12:99").is_err());
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(DayTime::parse("00:00").unwrap().to_string(), "00:00");
        assert_eq!(DayTime::parse("09:05").unwrap().to_string(), "09:05");
        assert_eq!(DayTime::parse("23:59").unwrap().to_string(), "23:59");
    }

    #[test]
    fn midnight_is_minimum() {
        for s in ["00:00", "00:01", "12:00", "23:59"] {
            assert!(DayTime::parse(s).unwrap() >= DayTime::MIDNIGHT);
        }
        assert_eq!(DayTime::MIDNIGHT, DayTime::parse("00:00").unwrap());
    }

    #[test]
    fn ordering_is_chronological() {
        let t1 = DayTime::parse("05:30").unwrap();
        let t2 = DayTime::parse("05:32").unwrap();
        let t3 = DayTime::parse("16:34").unwrap();

        assert!(t1 < t2);
        assert!(t2 < t3);
        assert!(t3 > t1);
    }

    #[test]
    fn at_date_stamps_calendar_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
        let stamped = DayTime::parse("05:36").unwrap().at_date(date);

        assert_eq!(stamped.to_string(), "2025-06-21 05:36:00");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_time()(hour in 0u32..24, minute in 0u32..60) -> String {
            format!("{:02}:{:02}", hour, minute)
        }
    }

    proptest! {
        /// Any valid HH:MM string parses successfully
        #[test]
        fn valid_hhmm_parses(s in valid_time()) {
            prop_assert!(DayTime::parse(&s).is_ok());
        }

        /// Parse then display roundtrips
        #[test]
        fn parse_display_roundtrip(s in valid_time()) {
            let parsed = DayTime::parse(&s).unwrap();
            prop_assert_eq!(parsed.to_string(), s);
        }

        /// DayTime ordering agrees with lexicographic ordering of the
        /// zero-padded string form. The query engine's time filters
        /// depend on this equivalence.
        #[test]
        fn ordering_matches_lexicographic(a in valid_time(), b in valid_time()) {
            let ta = DayTime::parse(&a).unwrap();
            let tb = DayTime::parse(&b).unwrap();
            prop_assert_eq!(ta.cmp(&tb), a.cmp(&b));
        }

        /// Invalid hour is rejected
        #[test]
        fn invalid_hour_rejected(hour in 24u32..100, minute in 0u32..60) {
            let s = format!("{:02}:{:02}", hour, minute);
            prop_assert!(DayTime::parse(&s).is_err());
        }

        /// Invalid minute is rejected
        #[test]
        fn invalid_minute_rejected(hour in 0u32..24, minute in 60u32..100) {
            let s = format!("{:02}:{:02}", hour, minute);
            prop_assert!(DayTime::parse(&s).is_err());
        }
    }
}
