//! Identifier newtypes.
//!
//! Stop, note and service ids are small integers in the timetable
//! document. Wrapping them keeps the three id spaces from being mixed up
//! in lookups.

use std::fmt;

/// Identifier of a physical stop.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(pub u32);

/// Identifier of a timetable note (e.g. "on request").
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(pub u32);

/// Identifier of a single scheduled run of a line.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(pub u32);

macro_rules! impl_id_fmt {
    ($ty:ident) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($ty), "({})"), self.0)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_id_fmt!(StopId);
impl_id_fmt!(NoteId);
impl_id_fmt!(ServiceId);
