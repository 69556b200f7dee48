//! Timetable dataset loading.
//!
//! The timetable arrives as a single structured JSON document, supplied
//! once at process start. This module parses it into raw DTOs and
//! converts those into the validated `domain::Timetable`, failing fast
//! on malformed data instead of propagating sentinel values into the
//! query and tracking layers.

mod convert;
mod error;
mod types;

pub use convert::convert;
pub use error::DatasetError;
pub use types::{
    CarrierContactDto, CarrierDto, LineDto, NoteDto, ServiceDto, StopDto, StopEventDto,
    TimetableDocument, TimetableDto,
};

use crate::domain::Timetable;

/// Parse and validate a timetable document from JSON text.
pub fn load_str(json: &str) -> Result<Timetable, DatasetError> {
    let document: TimetableDocument = serde_json::from_str(json)?;
    convert(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_dataset_loads() {
        let timetable = load_str(include_str!("../../data/sample-timetable.json")).unwrap();

        assert_eq!(timetable.stops.len(), 5);
        assert_eq!(timetable.notes.len(), 3);
        assert_eq!(timetable.lines.len(), 2);
        assert_eq!(timetable.carrier.name, "SteerCodeHack");
        assert_eq!(timetable.valid_from.to_string(), "2025-06-21");
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(
            load_str("not json"),
            Err(DatasetError::Parse(_))
        ));
    }
}
