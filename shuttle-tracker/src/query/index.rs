//! Derived lookup structures over the timetable.
//!
//! Built once at load time: the id<->name stop maps and the resolved
//! "request stop" note id. The maps are bijections over the declared
//! stops; building fails fast on a duplicate key rather than silently
//! overwriting an entry.

use std::collections::HashMap;

use crate::dataset::DatasetError;
use crate::domain::{NoteId, StopEvent, StopId, Timetable};

/// Marker phrase identifying the "request stop" note, matched as a
/// case-insensitive substring of the note text. This is the phrase the
/// dataset itself uses ("on request" in the dataset's language).
pub const REQUEST_STOP_PHRASE: &str = "na znamení";

/// Precomputed lookups over an immutable timetable.
#[derive(Debug, Clone)]
pub struct TimetableIndex {
    stop_id_to_name: HashMap<StopId, String>,
    stop_name_to_id: HashMap<String, StopId>,
    request_stop_note_id: Option<NoteId>,
}

impl TimetableIndex {
    /// Build the index from a timetable.
    ///
    /// # Errors
    ///
    /// Returns `Err` on a duplicate stop id or name. A timetable that
    /// came through `dataset::load_str` has already been checked; the
    /// recheck covers timetables constructed directly.
    pub fn build(timetable: &Timetable) -> Result<Self, DatasetError> {
        let mut stop_id_to_name = HashMap::with_capacity(timetable.stops.len());
        let mut stop_name_to_id = HashMap::with_capacity(timetable.stops.len());

        for stop in &timetable.stops {
            if stop_id_to_name
                .insert(stop.id, stop.name.clone())
                .is_some()
            {
                return Err(DatasetError::DuplicateStopId(stop.id));
            }
            if stop_name_to_id
                .insert(stop.name.clone(), stop.id)
                .is_some()
            {
                return Err(DatasetError::DuplicateStopName(stop.name.clone()));
            }
        }

        let request_stop_note_id = timetable
            .notes
            .iter()
            .find(|note| note.text.to_lowercase().contains(REQUEST_STOP_PHRASE))
            .map(|note| note.id);

        Ok(Self {
            stop_id_to_name,
            stop_name_to_id,
            request_stop_note_id,
        })
    }

    /// Resolve a stop id to its name.
    pub fn name_of(&self, id: StopId) -> Option<&str> {
        self.stop_id_to_name.get(&id).map(String::as_str)
    }

    /// Resolve a stop name to its id.
    pub fn id_of(&self, name: &str) -> Option<StopId> {
        self.stop_name_to_id.get(name).copied()
    }

    /// The resolved "request stop" note id, if the dataset declares one.
    pub fn request_stop_note_id(&self) -> Option<NoteId> {
        self.request_stop_note_id
    }

    /// Whether a specific call is served on request only.
    ///
    /// Always false when the dataset declares no request-stop note.
    pub fn is_request_stop(&self, event: &StopEvent) -> bool {
        match self.request_stop_note_id {
            Some(id) => event.note_ids.contains(&id),
            None => false,
        }
    }

    /// Number of indexed stops.
    pub fn len(&self) -> usize {
        self.stop_id_to_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stop_id_to_name.is_empty()
    }

    /// All indexed stop ids, in no particular order.
    pub fn stop_ids(&self) -> impl Iterator<Item = StopId> + '_ {
        self.stop_id_to_name.keys().copied()
    }
}
