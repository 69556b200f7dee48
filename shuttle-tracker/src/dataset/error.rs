//! Dataset loading and validation errors.

use crate::domain::{NoteId, ServiceId, StopId, TimeError};

/// Errors raised while loading or validating a timetable document.
///
/// Any of these is fatal for the load: the dataset is assumed correct by
/// everything downstream, so a malformed document is rejected here
/// instead of surfacing later as sentinel coordinates or silently
/// overwritten lookup entries.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The document is not valid JSON or does not match the schema.
    #[error("failed to parse timetable document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid validFrom date {value:?}: {source}")]
    InvalidValidFrom {
        value: String,
        source: chrono::ParseError,
    },

    #[error("duplicate stop id {0}")]
    DuplicateStopId(StopId),

    #[error("duplicate stop name {0:?}")]
    DuplicateStopName(String),

    #[error("duplicate note id {0}")]
    DuplicateNoteId(NoteId),

    #[error("duplicate line number {0:?}")]
    DuplicateLineNumber(String),

    #[error("duplicate service id {service} on line {line}")]
    DuplicateServiceId { line: String, service: ServiceId },

    #[error("service {service} on line {line}: schedule has {len} events, need at least 2")]
    ScheduleTooShort {
        line: String,
        service: ServiceId,
        len: usize,
    },

    #[error("service {service} on line {line} references unknown stop {stop}")]
    UnknownStop {
        line: String,
        service: ServiceId,
        stop: StopId,
    },

    #[error("service {service} on line {line} references unknown note {note}")]
    UnknownNote {
        line: String,
        service: ServiceId,
        note: NoteId,
    },

    #[error("service {service} on line {line}, event {index}: {source}")]
    InvalidTime {
        line: String,
        service: ServiceId,
        index: usize,
        source: TimeError,
    },

    #[error("service {service} on line {line}: departure at event {index} is earlier than the previous one")]
    UnorderedDepartures {
        line: String,
        service: ServiceId,
        index: usize,
    },

    #[error("service {service} on line {line}: terminal event must have no departure")]
    TerminalDeparture { line: String, service: ServiceId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DatasetError::DuplicateStopName("Za WC".into());
        assert_eq!(err.to_string(), "duplicate stop name \"Za WC\"");

        let err = DatasetError::UnknownStop {
            line: "14".into(),
            service: ServiceId(101),
            stop: StopId(9),
        };
        assert_eq!(
            err.to_string(),
            "service 101 on line 14 references unknown stop 9"
        );

        let err = DatasetError::ScheduleTooShort {
            line: "23".into(),
            service: ServiceId(301),
            len: 1,
        };
        assert!(err.to_string().contains("need at least 2"));
    }
}
