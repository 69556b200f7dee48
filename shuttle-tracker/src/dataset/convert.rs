//! Conversion from raw document types to the validated domain model.
//!
//! All dataset invariants are checked here, once, at load time: unique
//! ids and names, schedule shape, time formats and ordering, and that
//! every stop/note reference resolves. Everything downstream relies on
//! these checks instead of re-validating.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::domain::{
    Carrier, CarrierContact, Coordinates, DayTime, Line, Note, NoteId, Service, ServiceId, Stop,
    StopEvent, StopId, Timetable,
};

use super::error::DatasetError;
use super::types::{LineDto, ServiceDto, TimetableDocument};

/// Convert a parsed document into a validated `Timetable`.
pub fn convert(document: TimetableDocument) -> Result<Timetable, DatasetError> {
    let dto = document.timetable;

    let valid_from = NaiveDate::parse_from_str(&dto.valid_from, "%Y-%m-%d").map_err(|source| {
        DatasetError::InvalidValidFrom {
            value: dto.valid_from.clone(),
            source,
        }
    })?;

    // Stops: ids and names must each be unique, so that the id<->name
    // maps built by the query index are bijections.
    let mut stop_ids = HashSet::new();
    let mut stop_names = HashSet::new();
    let mut stops = Vec::with_capacity(dto.stops.len());
    for stop in dto.stops {
        let id = StopId(stop.id);
        if !stop_ids.insert(id) {
            return Err(DatasetError::DuplicateStopId(id));
        }
        if !stop_names.insert(stop.name.clone()) {
            return Err(DatasetError::DuplicateStopName(stop.name));
        }
        stops.push(Stop {
            id,
            name: stop.name,
            coordinates: Coordinates::new(stop.lat, stop.lon),
        });
    }

    let mut note_ids = HashSet::new();
    let mut notes = Vec::with_capacity(dto.notes.len());
    for note in dto.notes {
        let id = NoteId(note.id);
        if !note_ids.insert(id) {
            return Err(DatasetError::DuplicateNoteId(id));
        }
        notes.push(Note {
            id,
            symbol: note.symbol,
            text: note.text,
        });
    }

    let mut line_numbers = HashSet::new();
    let mut lines = Vec::with_capacity(dto.lines.len());
    for line in dto.lines {
        if !line_numbers.insert(line.line_number.clone()) {
            return Err(DatasetError::DuplicateLineNumber(line.line_number));
        }
        lines.push(convert_line(line, &stop_ids, &note_ids)?);
    }

    Ok(Timetable {
        version: dto.version,
        valid_from,
        carrier: Carrier {
            id: dto.carrier.id,
            name: dto.carrier.name,
            contact: CarrierContact {
                email: dto.carrier.contact.email,
                website: dto.carrier.contact.website,
            },
        },
        stops,
        notes,
        lines,
    })
}

fn convert_line(
    line: LineDto,
    stop_ids: &HashSet<StopId>,
    note_ids: &HashSet<NoteId>,
) -> Result<Line, DatasetError> {
    let mut service_ids = HashSet::new();
    let mut services = Vec::with_capacity(line.services.len());

    for service in line.services {
        let id = ServiceId(service.id);
        if !service_ids.insert(id) {
            return Err(DatasetError::DuplicateServiceId {
                line: line.line_number.clone(),
                service: id,
            });
        }
        services.push(convert_service(
            service,
            &line.line_number,
            stop_ids,
            note_ids,
        )?);
    }

    Ok(Line {
        id: line.id,
        line_number: line.line_number,
        description: line.description,
        services,
    })
}

fn convert_service(
    service: ServiceDto,
    line_number: &str,
    stop_ids: &HashSet<StopId>,
    note_ids: &HashSet<NoteId>,
) -> Result<Service, DatasetError> {
    let id = ServiceId(service.id);

    let check_note = |note: u32| -> Result<NoteId, DatasetError> {
        let note = NoteId(note);
        if note_ids.contains(&note) {
            Ok(note)
        } else {
            Err(DatasetError::UnknownNote {
                line: line_number.to_string(),
                service: id,
                note,
            })
        }
    };

    let run_notes = service
        .notes
        .into_iter()
        .map(check_note)
        .collect::<Result<Vec<_>, _>>()?;

    if service.schedule.len() < 2 {
        return Err(DatasetError::ScheduleTooShort {
            line: line_number.to_string(),
            service: id,
            len: service.schedule.len(),
        });
    }

    let last_index = service.schedule.len() - 1;
    let mut previous_departure: Option<DayTime> = None;
    let mut schedule = Vec::with_capacity(service.schedule.len());

    for (index, event) in service.schedule.into_iter().enumerate() {
        let stop_id = StopId(event.stop_id);
        if !stop_ids.contains(&stop_id) {
            return Err(DatasetError::UnknownStop {
                line: line_number.to_string(),
                service: id,
                stop: stop_id,
            });
        }

        let parse_time = |value: Option<String>| -> Result<Option<DayTime>, DatasetError> {
            value
                .map(|s| {
                    DayTime::parse(&s).map_err(|source| DatasetError::InvalidTime {
                        line: line_number.to_string(),
                        service: id,
                        index,
                        source,
                    })
                })
                .transpose()
        };

        let arrival = parse_time(event.arrival)?;
        let departure = parse_time(event.departure)?;

        if index == last_index && departure.is_some() {
            return Err(DatasetError::TerminalDeparture {
                line: line_number.to_string(),
                service: id,
            });
        }

        if let Some(dep) = departure {
            if previous_departure.is_some_and(|prev| dep < prev) {
                return Err(DatasetError::UnorderedDepartures {
                    line: line_number.to_string(),
                    service: id,
                    index,
                });
            }
            previous_departure = Some(dep);
        }

        let event_notes = event
            .notes
            .into_iter()
            .map(check_note)
            .collect::<Result<Vec<_>, _>>()?;

        schedule.push(StopEvent {
            stop_id,
            arrival,
            departure,
            note_ids: event_notes,
        });
    }

    Ok(Service {
        id,
        note_ids: run_notes,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::load_str;

    /// A small valid document that the individual tests mutate.
    fn base_document() -> serde_json::Value {
        serde_json::json!({
            "timetable": {
                "version": "1.0",
                "validFrom": "2025-06-21",
                "carrier": {
                    "id": "C1",
                    "name": "Carrier",
                    "contact": {"email": "a@b.c", "website": "b.c"}
                },
                "stops": [
                    {"id": 1, "name": "First", "lat": 50.0, "lon": 14.0},
                    {"id": 2, "name": "Last", "lat": 50.001, "lon": 14.001}
                ],
                "notes": [
                    {"id": 1, "symbol": "x", "text": "Zastávka na znamení"}
                ],
                "lines": [{
                    "id": "L1",
                    "lineNumber": "14",
                    "description": "First - Last",
                    "services": [{
                        "id": 101,
                        "notes": [],
                        "schedule": [
                            {"stopId": 1, "arrival": "05:30", "departure": "05:30"},
                            {"stopId": 2, "arrival": "05:36", "departure": null}
                        ]
                    }]
                }]
            }
        })
    }

    fn load(doc: serde_json::Value) -> Result<Timetable, DatasetError> {
        load_str(&doc.to_string())
    }

    #[test]
    fn valid_document_converts() {
        let timetable = load(base_document()).unwrap();

        assert_eq!(timetable.stops.len(), 2);
        assert_eq!(timetable.lines[0].services[0].schedule.len(), 2);
        assert_eq!(
            timetable.lines[0].services[0].final_stop_id(),
            StopId(2)
        );
    }

    #[test]
    fn duplicate_stop_id_rejected() {
        let mut doc = base_document();
        doc["timetable"]["stops"][1]["id"] = serde_json::json!(1);

        assert!(matches!(
            load(doc),
            Err(DatasetError::DuplicateStopId(StopId(1)))
        ));
    }

    #[test]
    fn duplicate_stop_name_rejected() {
        let mut doc = base_document();
        doc["timetable"]["stops"][1]["name"] = serde_json::json!("First");

        assert!(matches!(load(doc), Err(DatasetError::DuplicateStopName(_))));
    }

    #[test]
    fn duplicate_line_number_rejected() {
        let mut doc = base_document();
        let line = doc["timetable"]["lines"][0].clone();
        doc["timetable"]["lines"].as_array_mut().unwrap().push(line);

        assert!(matches!(
            load(doc),
            Err(DatasetError::DuplicateLineNumber(_))
        ));
    }

    #[test]
    fn duplicate_service_id_rejected() {
        let mut doc = base_document();
        let service = doc["timetable"]["lines"][0]["services"][0].clone();
        doc["timetable"]["lines"][0]["services"]
            .as_array_mut()
            .unwrap()
            .push(service);

        assert!(matches!(
            load(doc),
            Err(DatasetError::DuplicateServiceId { .. })
        ));
    }

    #[test]
    fn single_event_schedule_rejected() {
        let mut doc = base_document();
        doc["timetable"]["lines"][0]["services"][0]["schedule"] = serde_json::json!([
            {"stopId": 1, "arrival": "05:30", "departure": null}
        ]);

        assert!(matches!(
            load(doc),
            Err(DatasetError::ScheduleTooShort { len: 1, .. })
        ));
    }

    #[test]
    fn unknown_stop_reference_rejected() {
        let mut doc = base_document();
        doc["timetable"]["lines"][0]["services"][0]["schedule"][0]["stopId"] =
            serde_json::json!(99);

        assert!(matches!(
            load(doc),
            Err(DatasetError::UnknownStop {
                stop: StopId(99),
                ..
            })
        ));
    }

    #[test]
    fn unknown_note_reference_rejected() {
        let mut doc = base_document();
        doc["timetable"]["lines"][0]["services"][0]["schedule"][0]["notes"] =
            serde_json::json!([7]);

        assert!(matches!(
            load(doc),
            Err(DatasetError::UnknownNote { note: NoteId(7), .. })
        ));
    }

    #[test]
    fn malformed_time_rejected() {
        let mut doc = base_document();
        doc["timetable"]["lines"][0]["services"][0]["schedule"][0]["departure"] =
            serde_json::json!("5:30");

        assert!(matches!(load(doc), Err(DatasetError::InvalidTime { .. })));
    }

    #[test]
    fn decreasing_departures_rejected() {
        let mut doc = base_document();
        doc["timetable"]["lines"][0]["services"][0]["schedule"] = serde_json::json!([
            {"stopId": 1, "arrival": "06:30", "departure": "06:30"},
            {"stopId": 2, "arrival": "06:32", "departure": "05:32"},
            {"stopId": 1, "arrival": "06:40", "departure": null}
        ]);

        assert!(matches!(
            load(doc),
            Err(DatasetError::UnorderedDepartures { index: 1, .. })
        ));
    }

    #[test]
    fn terminal_departure_rejected() {
        let mut doc = base_document();
        doc["timetable"]["lines"][0]["services"][0]["schedule"][1]["departure"] =
            serde_json::json!("05:40");

        assert!(matches!(
            load(doc),
            Err(DatasetError::TerminalDeparture { .. })
        ));
    }

    #[test]
    fn invalid_valid_from_rejected() {
        let mut doc = base_document();
        doc["timetable"]["validFrom"] = serde_json::json!("21.6.2025");

        assert!(matches!(
            load(doc),
            Err(DatasetError::InvalidValidFrom { .. })
        ));
    }

    #[test]
    fn equal_departures_accepted() {
        // Coincident or zero-dwell stops may share a departure minute.
        let mut doc = base_document();
        doc["timetable"]["lines"][0]["services"][0]["schedule"] = serde_json::json!([
            {"stopId": 1, "arrival": "05:30", "departure": "05:30"},
            {"stopId": 2, "arrival": "05:30", "departure": "05:30"},
            {"stopId": 1, "arrival": "05:31", "departure": null}
        ]);

        assert!(load(doc).is_ok());
    }
}
