use crate::db::EVENTS_TABLE;
use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use rusqlite::{Connection, OptionalExtension, Result};

/// Version tag written to the audit table when the legacy layout is upgraded.
pub const LEGACY_RENAME_VERSION: &str = "20251016_0001_drug_log_event_name";

/// Legacy names of the primary label column, most recent first.
const LEGACY_NAME_COLUMNS: [&str; 2] = ["event", "drug"];
/// Legacy name of the timestamp column.
const LEGACY_TIME_COLUMN: &str = "ts";

const CURRENT_COLUMNS: [&str; 5] = ["id", "event_name", "note", "timestamp", "extra"];

/// Shape of the events table as found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaState {
    Missing,
    Current,
    Legacy(Vec<String>),
}

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn events_table_sql(name: &str) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {name} (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            event_name TEXT NOT NULL,
            note       TEXT NOT NULL DEFAULT '',
            timestamp  TEXT NOT NULL,
            extra      TEXT NOT NULL DEFAULT ''
        );
        "#
    )
}

pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn table_columns(conn: &Connection, name: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{name}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    let mut out = Vec::new();
    for c in cols {
        out.push(c?);
    }
    Ok(out)
}

/// Inspect the events table.
pub fn schema_state(conn: &Connection) -> Result<SchemaState> {
    if !table_exists(conn, EVENTS_TABLE)? {
        return Ok(SchemaState::Missing);
    }

    let cols = table_columns(conn, EVENTS_TABLE)?;
    if CURRENT_COLUMNS.iter().all(|c| cols.iter().any(|x| x == c)) {
        Ok(SchemaState::Current)
    } else {
        Ok(SchemaState::Legacy(cols))
    }
}

/// Build the INSERT .. SELECT that copies a legacy table into the new layout.
fn legacy_copy_sql(cols: &[String]) -> AppResult<String> {
    let has = |c: &str| cols.iter().any(|x| x == c);

    let name_col = LEGACY_NAME_COLUMNS
        .iter()
        .find(|c| has(c))
        .ok_or_else(|| {
            AppError::Migration(format!(
                "unrecognized layout for table '{EVENTS_TABLE}': columns {cols:?}"
            ))
        })?;

    let note_expr = if has("note") { "COALESCE(note, '')" } else { "''" };

    let time_expr = if has("timestamp") {
        "COALESCE(timestamp, '')".to_string()
    } else if has(LEGACY_TIME_COLUMN) {
        format!("COALESCE({LEGACY_TIME_COLUMN}, '')")
    } else {
        "''".to_string()
    };

    let extra_expr = if has("extra") { "COALESCE(extra, '')" } else { "''" };

    Ok(format!(
        "INSERT INTO {EVENTS_TABLE}_new (id, event_name, note, timestamp, extra)
         SELECT id, COALESCE({name_col}, ''), {note_expr}, {time_expr}, {extra_expr}
         FROM {EVENTS_TABLE}"
    ))
}

/// Rebuild a legacy events table in place. All-or-nothing: any failure rolls
/// the transaction back and leaves the old table untouched.
fn migrate_legacy_events(conn: &Connection, cols: &[String]) -> AppResult<()> {
    warning(format!(
        "Legacy '{EVENTS_TABLE}' layout detected ({}), upgrading...",
        cols.join(", ")
    ));

    let copy_sql = legacy_copy_sql(cols)?;

    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(&format!("DROP TABLE IF EXISTS {EVENTS_TABLE}_new;"))?;
    tx.execute_batch(&events_table_sql(&format!("{EVENTS_TABLE}_new")))?;
    let copied = tx.execute(&copy_sql, [])?;
    tx.execute_batch(&format!(
        r#"
        DROP TABLE {EVENTS_TABLE};
        ALTER TABLE {EVENTS_TABLE}_new RENAME TO {EVENTS_TABLE};

        UPDATE sqlite_sequence
            SET seq = (SELECT IFNULL(MAX(id), 0) FROM {EVENTS_TABLE})
        WHERE name = '{EVENTS_TABLE}';
        "#
    ))?;

    audit(
        &tx,
        "migration_applied",
        LEGACY_RENAME_VERSION,
        &format!("Rebuilt {EVENTS_TABLE} with event_name column ({copied} rows)"),
    )?;

    tx.commit()?;

    success(format!(
        "Migration applied: {LEGACY_RENAME_VERSION} → {copied} rows carried over"
    ));
    Ok(())
}

/// True if the given migration version is recorded in the audit table.
pub fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Public entry point: run all pending migrations.
///
/// Idempotent; safe on every start. Invoked by `EventStore::init`.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Create or upgrade the events table
    match schema_state(conn)? {
        SchemaState::Missing => {
            conn.execute_batch(&events_table_sql(EVENTS_TABLE))?;
        }
        SchemaState::Current => {}
        SchemaState::Legacy(cols) => migrate_legacy_events(conn, &cols)?,
    }

    Ok(())
}
