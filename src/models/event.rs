use serde::Serialize;
use serde_json::Value;

/// One persisted care event. Rows are append-only: never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub id: i64,                // ⇔ drug_log.id (AUTOINCREMENT)
    pub event_name: String,     // ⇔ drug_log.event_name
    pub note: String,           // ⇔ drug_log.note (TEXT, default '')
    pub timestamp: String,      // ⇔ drug_log.timestamp (TEXT, zone-aware)
    pub extra: Option<Value>,   // ⇔ drug_log.extra (JSON text, '' when absent)
}

impl EventRecord {
    /// One-line summary used in the rolling classifier history.
    pub fn summary(&self) -> String {
        format!("{} {} - {}", self.timestamp, self.event_name, self.note)
    }

    /// Raw stored form of `extra`.
    pub fn extra_text(&self) -> String {
        encode_extra(self.extra.as_ref())
    }
}

/// Serialize `extra` for storage.
///
/// Null and empty payloads (`{}`, `[]`, `""`) collapse to the empty string,
/// which [`decode_extra`] reads back as `None`.
pub fn encode_extra(extra: Option<&Value>) -> String {
    match extra {
        None | Some(Value::Null) => String::new(),
        Some(Value::Object(m)) if m.is_empty() => String::new(),
        Some(Value::Array(a)) if a.is_empty() => String::new(),
        Some(Value::String(s)) if s.is_empty() => String::new(),
        Some(v) => v.to_string(),
    }
}

/// Inverse of [`encode_extra`]. Non-JSON text survives as a string value.
pub fn decode_extra(raw: &str) -> Option<Value> {
    if raw.is_empty() {
        return None;
    }
    Some(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}
