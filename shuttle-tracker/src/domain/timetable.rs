//! The validated timetable model.
//!
//! A `Timetable` is loaded once at process start (see the `dataset`
//! module) and never mutated, so the query side needs no locking.

use chrono::NaiveDate;

use super::{Coordinates, DayTime, NoteId, ServiceId, StopId};

/// A physical, uniquely identified and uniquely named location.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub coordinates: Coordinates,
}

/// An annotation such as "on request" or "accessible vehicle".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub symbol: String,
    pub text: String,
}

/// One scheduled call of a service at a stop.
///
/// The first event of a schedule may have no meaningful arrival; the
/// terminal event has no departure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopEvent {
    pub stop_id: StopId,
    pub arrival: Option<DayTime>,
    pub departure: Option<DayTime>,
    pub note_ids: Vec<NoteId>,
}

/// One scheduled run of a line, visiting an ordered sequence of stops.
///
/// Validated invariants: the schedule has at least two events, departure
/// times are non-decreasing along it, and the last event has no
/// departure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub id: ServiceId,
    /// Notes applying to the whole run.
    pub note_ids: Vec<NoteId>,
    pub schedule: Vec<StopEvent>,
}

impl Service {
    /// The stop id of the terminal event.
    pub fn final_stop_id(&self) -> StopId {
        // Schedules are validated to hold at least two events.
        self.schedule[self.schedule.len() - 1].stop_id
    }
}

/// A named route grouping many services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub id: String,
    /// The human-facing key used in queries, e.g. "14".
    pub line_number: String,
    pub description: String,
    pub services: Vec<Service>,
}

/// Operator metadata carried by the timetable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carrier {
    pub id: String,
    pub name: String,
    pub contact: CarrierContact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierContact {
    pub email: String,
    pub website: String,
}

/// The whole immutable dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Timetable {
    pub version: String,
    pub valid_from: NaiveDate,
    pub carrier: Carrier,
    pub stops: Vec<Stop>,
    pub notes: Vec<Note>,
    pub lines: Vec<Line>,
}

impl Timetable {
    /// Look up a stop by id.
    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.iter().find(|s| s.id == id)
    }

    /// First line whose `line_number` matches.
    pub fn line_by_number(&self, line_number: &str) -> Option<&Line> {
        self.lines.iter().find(|l| l.line_number == line_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(stop: u32, arr: &str, dep: Option<&str>) -> StopEvent {
        StopEvent {
            stop_id: StopId(stop),
            arrival: Some(DayTime::parse(arr).unwrap()),
            departure: dep.map(|d| DayTime::parse(d).unwrap()),
            note_ids: vec![],
        }
    }

    #[test]
    fn final_stop_is_last_event() {
        let service = Service {
            id: ServiceId(101),
            note_ids: vec![],
            schedule: vec![
                event(1, "05:30", Some("05:30")),
                event(2, "05:32", Some("05:32")),
                event(4, "05:36", None),
            ],
        };

        assert_eq!(service.final_stop_id(), StopId(4));
    }
}
