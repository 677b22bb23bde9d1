// src/db/records_db_conn.rs
use std::fs;
use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use tracing::debug;

use crate::error::CoreResult;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS records (
        id         TEXT PRIMARY KEY,
        payload    BLOB NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS postings (
        trapdoor  TEXT NOT NULL,
        record_id TEXT NOT NULL REFERENCES records(id),
        tag       BLOB,
        UNIQUE (trapdoor, record_id)
    );

    CREATE INDEX IF NOT EXISTS idx_postings_trapdoor ON postings(trapdoor);
"#;

/// Open (creating if needed) the records database at `path`
pub fn open_records_db<P: AsRef<Path>>(path: P, busy_timeout: Duration) -> CoreResult<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    conn.busy_timeout(busy_timeout)?;
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
    init_schema(&conn)?;

    debug!(path = %path.display(), "records database open");
    Ok(conn)
}

/// Private, non-durable database: tests and throwaway vaults
pub fn open_records_db_in_memory() -> CoreResult<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.execute_batch(SCHEMA)
}
