//! Shuttle timetable lookup and live trip tracking.
//!
//! Answers "when does the next shuttle leave this stop?" over a small
//! validated timetable, and tracks a driver's live run against one
//! service's schedule from a stream of position fixes.

pub mod dataset;
pub mod domain;
pub mod query;
pub mod tracker;
