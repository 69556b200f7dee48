//! Raw document types for the timetable JSON.
//!
//! These mirror the document shape exactly; validation happens in
//! `convert` when they are turned into domain types.

use serde::Deserialize;

/// Root object of the timetable document.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetableDocument {
    pub timetable: TimetableDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableDto {
    pub version: String,
    pub valid_from: String,
    pub carrier: CarrierDto,
    pub stops: Vec<StopDto>,
    pub notes: Vec<NoteDto>,
    pub lines: Vec<LineDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarrierDto {
    pub id: String,
    pub name: String,
    pub contact: CarrierContactDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarrierContactDto {
    pub email: String,
    pub website: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopDto {
    pub id: u32,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoteDto {
    pub id: u32,
    pub symbol: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopEventDto {
    pub stop_id: u32,
    pub arrival: Option<String>,
    pub departure: Option<String>,
    /// Notes specific to this call; absent in the document for most events.
    #[serde(default)]
    pub notes: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceDto {
    pub id: u32,
    /// Notes applying to the whole run.
    #[serde(default)]
    pub notes: Vec<u32>,
    pub schedule: Vec<StopEventDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDto {
    pub id: String,
    pub line_number: String,
    pub description: String,
    pub services: Vec<ServiceDto>,
}
