use crate::db::EVENTS_TABLE;
use crate::errors::AppResult;
use crate::models::event::{EventRecord, decode_extra, encode_extra};
use rusqlite::{Connection, Result, Row, params};
use serde_json::Value;

pub fn map_row(row: &Row) -> Result<EventRecord> {
    let extra: String = row.get("extra")?;

    Ok(EventRecord {
        id: row.get("id")?,
        event_name: row.get("event_name")?,
        note: row.get("note")?,
        timestamp: row.get("timestamp")?,
        extra: decode_extra(&extra),
    })
}

pub fn insert_event(
    conn: &Connection,
    event_name: &str,
    note: &str,
    timestamp: &str,
    extra: Option<&Value>,
) -> AppResult<i64> {
    let sql = format!(
        "INSERT INTO {EVENTS_TABLE} (event_name, note, timestamp, extra)
         VALUES (?1, ?2, ?3, ?4)"
    );
    conn.execute(
        &sql,
        params![event_name, note, timestamp, encode_extra(extra)],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent `limit` events, id descending. A non-positive limit yields no rows.
pub fn load_recent(conn: &Connection, limit: i64) -> AppResult<Vec<EventRecord>> {
    if limit <= 0 {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT id, event_name, note, timestamp, extra FROM {EVENTS_TABLE}
         ORDER BY id DESC
         LIMIT ?1"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([limit], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_all(conn: &Connection) -> AppResult<Vec<EventRecord>> {
    let sql = format!(
        "SELECT id, event_name, note, timestamp, extra FROM {EVENTS_TABLE}
         ORDER BY id DESC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_events(conn: &Connection) -> AppResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {EVENTS_TABLE}");
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}

pub fn delete_all_events(conn: &Connection) -> AppResult<usize> {
    let sql = format!("DELETE FROM {EVENTS_TABLE}");
    Ok(conn.execute(&sql, [])?)
}
