//! Time utilities: zone-aware record timestamps and countdown formatting.

use crate::errors::{AppError, AppResult};
use chrono::format::{Item, StrftimeItems};
use chrono::{FixedOffset, Local, Utc};

/// Parse the configured offset. `"local"` (or empty) means the host zone.
pub fn parse_offset(s: &str) -> AppResult<Option<FixedOffset>> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("local") {
        return Ok(None);
    }
    s.parse::<FixedOffset>()
        .map(Some)
        .map_err(|_| AppError::Config(format!("Invalid utc_offset: {s}")))
}

/// Reject strftime patterns chrono cannot render.
pub fn validate_format(format: &str) -> AppResult<()> {
    if StrftimeItems::new(format).any(|i| matches!(i, Item::Error)) {
        return Err(AppError::Config(format!("Invalid timestamp_format: {format}")));
    }
    Ok(())
}

/// Current instant formatted in the given zone. `format` must have passed
/// [`validate_format`].
pub fn now_in_zone(offset: Option<FixedOffset>, format: &str) -> String {
    match offset {
        Some(tz) => Utc::now().with_timezone(&tz).format(format).to_string(),
        None => Local::now().format(format).to_string(),
    }
}

/// Default store timestamp: current instant in UTC, RFC 3339.
pub fn utc_now_iso() -> String {
    Utc::now().to_rfc3339()
}

/// Human form of a countdown duration, e.g. `3m 05s`.
pub fn format_seconds(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else {
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}
