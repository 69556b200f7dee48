//! The schedule query operations.
//!
//! Stateless reads over the built index: list lines, list a line's
//! services, departures from a stop, direct connections between two
//! stops, and the per-stop expansion of one service used by the live
//! tracker. Every operation is total; absence is a valid, checkable
//! outcome reported as an empty result plus a diagnostic log line.
//!
//! The departure and connection scans are full scans over every
//! line/service/event. That is O(lines × services × events) and fine for
//! a dataset of this size; none of it is on a hot path.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::dataset::DatasetError;
use crate::domain::{Coordinates, DayTime, Service, ServiceId, StopEvent, Timetable};

use super::index::TimetableIndex;

/// One row of the "all lines" listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSummary {
    pub line_number: String,
    pub description: String,
}

/// One departure of some service from a queried stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub line: String,
    pub service: ServiceId,
    pub departure: DayTime,
    pub final_stop: String,
}

/// A direct same-service connection between two stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub line: String,
    pub departure: DayTime,
    pub arrival: DayTime,
    /// The inclusive sub-sequence of calls from origin to destination.
    pub journey: Vec<StopEvent>,
}

/// Presentation record for one call of an expanded service.
///
/// This is the shape the live tracker consumes: resolved name and
/// coordinates, date-stamped times, and the request-stop flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceStop {
    pub stop_name: String,
    pub arrival: Option<NaiveDateTime>,
    pub departure: Option<NaiveDateTime>,
    pub is_request_stop: bool,
    pub coordinates: Coordinates,
    /// Every line number whose any service visits a stop of this name.
    pub lines: Vec<String>,
}

/// Stateless query engine over an immutable timetable.
///
/// The timetable is never mutated after load, so the engine borrows it
/// and needs no locking for concurrent readers.
pub struct ScheduleQueryEngine<'a> {
    timetable: &'a Timetable,
    index: TimetableIndex,
}

impl<'a> ScheduleQueryEngine<'a> {
    /// Build the engine, constructing the lookup index once.
    pub fn new(timetable: &'a Timetable) -> Result<Self, DatasetError> {
        let index = TimetableIndex::build(timetable)?;
        Ok(Self { timetable, index })
    }

    /// The index built for this timetable.
    pub fn index(&self) -> &TimetableIndex {
        &self.index
    }

    /// All lines, in dataset declaration order.
    pub fn lines(&self) -> Vec<LineSummary> {
        self.timetable
            .lines
            .iter()
            .map(|line| LineSummary {
                line_number: line.line_number.clone(),
                description: line.description.clone(),
            })
            .collect()
    }

    /// All services of the first line whose number matches.
    pub fn services_for_line(&self, line_number: &str) -> Option<&[Service]> {
        match self.timetable.line_by_number(line_number) {
            Some(line) => Some(&line.services),
            None => {
                warn!(line_number, "line not found");
                None
            }
        }
    }

    /// All departures from a stop at or after `after`, ascending by
    /// departure time. Ties keep dataset scan order (stable sort).
    pub fn departures_from_stop(&self, stop_name: &str, after: DayTime) -> Vec<Departure> {
        let Some(stop_id) = self.index.id_of(stop_name) else {
            warn!(stop_name, "stop not found");
            return Vec::new();
        };

        let mut departures = Vec::new();

        for line in &self.timetable.lines {
            for service in &line.services {
                for event in &service.schedule {
                    if event.stop_id != stop_id {
                        continue;
                    }
                    let Some(departure) = event.departure else {
                        continue;
                    };
                    if departure < after {
                        continue;
                    }
                    let Some(final_stop) = self.index.name_of(service.final_stop_id()) else {
                        continue;
                    };
                    departures.push(Departure {
                        line: line.line_number.clone(),
                        service: service.id,
                        departure,
                        final_stop: final_stop.to_string(),
                    });
                }
            }
        }

        departures.sort_by_key(|d| d.departure);
        departures
    }

    /// Direct same-service connections from one stop to another, with a
    /// departure at or after `after`, ascending by departure time.
    ///
    /// A connection requires both stops on one service's schedule with
    /// the origin strictly before the destination; no transfers.
    pub fn connections(&self, from: &str, to: &str, after: DayTime) -> Vec<Connection> {
        let (Some(from_id), Some(to_id)) = (self.index.id_of(from), self.index.id_of(to)) else {
            warn!(from, to, "one or both stops not found");
            return Vec::new();
        };

        let mut connections = Vec::new();

        for line in &self.timetable.lines {
            for service in &line.services {
                let from_index = service.schedule.iter().position(|e| e.stop_id == from_id);
                let to_index = service.schedule.iter().position(|e| e.stop_id == to_id);

                let (Some(from_index), Some(to_index)) = (from_index, to_index) else {
                    continue;
                };
                if from_index >= to_index {
                    continue;
                }

                let from_event = &service.schedule[from_index];
                let to_event = &service.schedule[to_index];

                let Some(departure) = from_event.departure else {
                    continue;
                };
                let Some(arrival) = to_event.arrival else {
                    continue;
                };
                if departure < after {
                    continue;
                }

                connections.push(Connection {
                    line: line.line_number.clone(),
                    departure,
                    arrival,
                    journey: service.schedule[from_index..=to_index].to_vec(),
                });
            }
        }

        connections.sort_by_key(|c| c.departure);
        connections
    }

    /// Expand one service of a line into per-stop presentation records.
    ///
    /// Times are stamped onto `on_date` (the caller passes today's date
    /// from its wall clock). Known limitation: a service crossing
    /// midnight gets the same date on both sides of it.
    pub fn service_details(
        &self,
        line_number: &str,
        service_id: ServiceId,
        on_date: NaiveDate,
    ) -> Vec<ServiceStop> {
        let Some(line) = self.timetable.line_by_number(line_number) else {
            warn!(line_number, "line not found");
            return Vec::new();
        };
        let Some(service) = line.services.iter().find(|s| s.id == service_id) else {
            warn!(line_number, service = %service_id, "service not found on line");
            return Vec::new();
        };

        let mut details = Vec::with_capacity(service.schedule.len());

        for event in &service.schedule {
            let Some(stop) = self.timetable.stop(event.stop_id) else {
                // Unreachable for validated timetables.
                warn!(stop = %event.stop_id, "schedule references unknown stop");
                continue;
            };

            details.push(ServiceStop {
                stop_name: stop.name.clone(),
                arrival: event.arrival.map(|t| t.at_date(on_date)),
                departure: event.departure.map(|t| t.at_date(on_date)),
                is_request_stop: self.index.is_request_stop(event),
                coordinates: stop.coordinates,
                lines: self.lines_through_stop(&stop.name),
            });
        }

        details
    }

    /// Every line number whose any service visits a stop of this name,
    /// in declaration order, without duplicates. Full scan.
    pub fn lines_through_stop(&self, stop_name: &str) -> Vec<String> {
        let Some(stop_id) = self.index.id_of(stop_name) else {
            return Vec::new();
        };

        let mut passing = Vec::new();
        for line in &self.timetable.lines {
            let visits = line
                .services
                .iter()
                .any(|s| s.schedule.iter().any(|e| e.stop_id == stop_id));
            if visits && !passing.contains(&line.line_number) {
                passing.push(line.line_number.clone());
            }
        }
        passing
    }
}
