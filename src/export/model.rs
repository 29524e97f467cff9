// src/export/model.rs

use crate::models::event::EventRecord;
use serde::Serialize;

/// Flat export row: `{id, event_name, note, timestamp, extra}`.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EventExport {
    pub id: i64,
    pub event_name: String,
    pub note: String,
    pub timestamp: String,
    /// Stored JSON text, empty when absent.
    pub extra: String,
}

impl From<&EventRecord> for EventExport {
    fn from(r: &EventRecord) -> Self {
        Self {
            id: r.id,
            event_name: r.event_name.clone(),
            note: r.note.clone(),
            timestamp: r.timestamp.clone(),
            extra: r.extra_text(),
        }
    }
}

/// Header for CSV / XLSX
pub(crate) fn get_headers() -> Vec<&'static str> {
    vec!["id", "event_name", "note", "timestamp", "extra"]
}

pub(crate) fn event_to_row(e: &EventExport) -> Vec<String> {
    vec![
        e.id.to_string(),
        e.event_name.clone(),
        e.note.clone(),
        e.timestamp.clone(),
        e.extra.clone(),
    ]
}
