//! Append-only SQLite store for care events.

use crate::db::{log, migrate, queries};
use crate::errors::AppResult;
use crate::models::event::EventRecord;
use crate::utils::time::utc_now_iso;
use rusqlite::Connection;
use serde_json::Value;
use std::path::Path;

pub struct EventStore {
    conn: Connection,
}

impl EventStore {
    pub fn open<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Create or upgrade the schema. Idempotent.
    pub fn init(&self) -> AppResult<()> {
        migrate::run_pending_migrations(&self.conn)
    }

    /// Insert one record and return its id.
    ///
    /// `timestamp` defaults to the current UTC instant (RFC 3339).
    pub fn append(
        &self,
        event_name: &str,
        note: &str,
        timestamp: Option<&str>,
        extra: Option<&Value>,
    ) -> AppResult<i64> {
        let ts = match timestamp {
            Some(t) => t.to_string(),
            None => utc_now_iso(),
        };
        queries::insert_event(&self.conn, event_name, note, &ts, extra)
    }

    /// Up to `limit` most recent records, id descending. `limit <= 0` yields nothing.
    pub fn list(&self, limit: i64) -> AppResult<Vec<EventRecord>> {
        queries::load_recent(&self.conn, limit)
    }

    /// Every record, id descending.
    pub fn list_all(&self) -> AppResult<Vec<EventRecord>> {
        queries::load_all(&self.conn)
    }

    pub fn count(&self) -> AppResult<i64> {
        queries::count_events(&self.conn)
    }

    /// Delete every record. Ids keep increasing afterwards.
    pub fn clear_all(&self) -> AppResult<usize> {
        let removed = queries::delete_all_events(&self.conn)?;
        log::audit(
            &self.conn,
            "clear",
            crate::db::EVENTS_TABLE,
            &format!("Removed {removed} records"),
        )?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate::{LEGACY_RENAME_VERSION, SchemaState, migration_applied, schema_state, table_exists};
    use crate::db::log::load_log;
    use serde_json::json;

    fn store() -> EventStore {
        let s = EventStore::open_in_memory().unwrap();
        s.init().unwrap();
        s
    }

    #[test]
    fn append_then_list_returns_descending_ids() {
        let s = store();
        let mut ids = Vec::new();
        for i in 0..5 {
            let extra = if i % 2 == 0 { Some(json!({"n": i})) } else { None };
            ids.push(
                s.append(&format!("ev{i}"), &format!("note {i}"), Some(format!("t{i}").as_str()), extra.as_ref())
                    .unwrap(),
            );
        }

        let rows = s.list(5).unwrap();
        assert_eq!(rows.len(), 5);
        assert!(rows.windows(2).all(|w| w[0].id > w[1].id));

        for (row, i) in rows.iter().zip((0..5).rev()) {
            assert_eq!(row.id, ids[i]);
            assert_eq!(row.event_name, format!("ev{i}"));
            assert_eq!(row.note, format!("note {i}"));
            assert_eq!(row.timestamp, format!("t{i}"));
            if i % 2 == 0 {
                assert_eq!(row.extra, Some(json!({"n": i})));
            } else {
                assert_eq!(row.extra, None);
                assert_eq!(row.extra_text(), "");
            }
        }
    }

    #[test]
    fn list_respects_limit_and_non_positive_limits() {
        let s = store();
        for i in 0..4 {
            s.append("ev", "", Some(i.to_string().as_str()), None).unwrap();
        }
        assert_eq!(s.list(2).unwrap().len(), 2);
        assert_eq!(s.list(2).unwrap()[0].timestamp, "3");
        assert!(s.list(0).unwrap().is_empty());
        assert!(s.list(-3).unwrap().is_empty());
    }

    #[test]
    fn default_timestamp_is_rfc3339_utc() {
        let s = store();
        s.append("ev", "", None, None).unwrap();
        let ts = &s.list(1).unwrap()[0].timestamp;
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "{ts}");
    }

    #[test]
    fn clear_all_is_idempotent_and_ids_keep_growing() {
        let s = store();
        let first = s.append("a", "", None, None).unwrap();
        assert_eq!(s.clear_all().unwrap(), 1);
        assert!(s.list(10).unwrap().is_empty());
        assert_eq!(s.clear_all().unwrap(), 0);
        assert_eq!(s.count().unwrap(), 0);

        let next = s.append("b", "", None, None).unwrap();
        assert!(next > first);
    }

    #[test]
    fn init_is_idempotent() {
        let s = store();
        s.append("a", "", None, None).unwrap();
        s.init().unwrap();
        s.init().unwrap();
        assert_eq!(s.count().unwrap(), 1);
    }

    #[test]
    fn legacy_drug_layout_is_migrated_in_place() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE drug_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                drug TEXT,
                note TEXT,
                ts TEXT
            );
            INSERT INTO drug_log (drug, note, ts) VALUES ('Epinephrine', '1mg IV', '2025/01/01 10:00');
            INSERT INTO drug_log (drug, note, ts) VALUES ('Amiodarone', NULL, '2025/01/01 10:05');
            "#,
        )
        .unwrap();

        let s = EventStore::from_connection(conn);
        s.init().unwrap();

        assert_eq!(schema_state(s.conn()).unwrap(), SchemaState::Current);
        assert!(!table_exists(s.conn(), "drug_log_new").unwrap());
        assert!(migration_applied(s.conn(), LEGACY_RENAME_VERSION).unwrap());

        let rows = s.list(10).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].event_name, "Amiodarone");
        assert_eq!(rows[0].note, "");
        assert_eq!(rows[1].event_name, "Epinephrine");
        assert_eq!(rows[1].timestamp, "2025/01/01 10:00");
        assert!(rows.iter().all(|r| r.extra.is_none()));

        // new ids continue after the migrated ones
        let id = s.append("CPR", "", None, None).unwrap();
        assert_eq!(id, 3);

        // second init is a no-op
        s.init().unwrap();
        assert_eq!(s.count().unwrap(), 3);
    }

    #[test]
    fn legacy_event_layout_keeps_extra() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE drug_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                event TEXT,
                note TEXT,
                ts TEXT,
                extra TEXT
            );
            INSERT INTO drug_log (event, note, ts, extra)
                VALUES ('OHCA', 'bystander CPR', '2025/02/03 08:00', '{"rhythm":"VF"}');
            INSERT INTO drug_log (event, note, ts, extra)
                VALUES ('Defib 200J', NULL, '2025/02/03 08:02', NULL);
            "#,
        )
        .unwrap();

        let s = EventStore::from_connection(conn);
        s.init().unwrap();

        assert_eq!(schema_state(s.conn()).unwrap(), SchemaState::Current);
        let rows = s.list(10).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].id, rows[0].event_name.as_str()), (2, "Defib 200J"));
        assert_eq!(rows[0].extra, None);
        assert_eq!((rows[1].id, rows[1].event_name.as_str()), (1, "OHCA"));
        assert_eq!(rows[1].note, "bystander CPR");
        assert_eq!(rows[1].timestamp, "2025/02/03 08:00");
        assert_eq!(rows[1].extra, Some(json!({"rhythm": "VF"})));
    }

    #[test]
    fn migration_audit_row_uses_rfc3339_dates() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE drug_log (id INTEGER PRIMARY KEY, drug TEXT, ts TEXT);")
            .unwrap();

        let s = EventStore::from_connection(conn);
        s.init().unwrap();

        let rows = load_log(s.conn()).unwrap();
        let applied = rows
            .iter()
            .find(|r| r.operation == "migration_applied")
            .unwrap();
        assert_eq!(applied.target, LEGACY_RENAME_VERSION);
        assert!(
            chrono::DateTime::parse_from_rfc3339(&applied.date).is_ok(),
            "{}",
            applied.date
        );
    }

    #[test]
    fn unknown_legacy_layout_fails_and_keeps_the_table() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE drug_log (id INTEGER PRIMARY KEY, what TEXT);
             INSERT INTO drug_log (what) VALUES ('x');",
        )
        .unwrap();

        let s = EventStore::from_connection(conn);
        let err = s.init().unwrap_err();
        assert!(err.is_storage());

        let n: i64 = s
            .conn()
            .query_row("SELECT COUNT(*) FROM drug_log", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 1);
        assert!(!table_exists(s.conn(), "drug_log_new").unwrap());
    }
}
