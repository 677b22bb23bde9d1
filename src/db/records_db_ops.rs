//! Records database operations
//!
//! Row-level reads and the single write path. `commit_record` is the one
//! unit of work that makes a record visible: blob and every posting land in
//! the same `BEGIN IMMEDIATE` transaction or not at all.

use rusqlite::{params, Connection, ErrorCode, OptionalExtension, TransactionBehavior};

use crate::crypto::Trapdoor;
use crate::error::{CoreError, CoreResult};

/// Everything one insert writes, computed before the transaction opens
#[derive(Debug, Clone)]
pub struct PendingRecord {
    pub id: String,
    pub blob: Vec<u8>,
    pub postings: Vec<PendingPosting>,
}

#[derive(Debug, Clone)]
pub struct PendingPosting {
    pub trapdoor: Trapdoor,
    pub tag: Option<[u8; 32]>,
}

/// One row of a trapdoor lookup: the record it points at plus the posting tag
#[derive(Debug, Clone)]
pub struct PostingHit {
    pub record_id: String,
    pub blob: Vec<u8>,
    pub tag: Option<Vec<u8>>,
}

pub fn record_exists(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    conn.query_row("SELECT 1 FROM records WHERE id = ?1", [id], |_| Ok(()))
        .optional()
        .map(|row| row.is_some())
}

pub fn record_count(conn: &Connection) -> rusqlite::Result<u64> {
    conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get::<_, i64>(0))
        .map(|n| n.max(0) as u64)
}

/// Write blob + postings atomically; duplicate identifiers leave the database untouched
pub fn commit_record(conn: &mut Connection, pending: &PendingRecord) -> CoreResult<()> {
    // IMMEDIATE takes the write lock up front, so the existence check and the
    // insert cannot interleave with another writer
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if record_exists(&tx, &pending.id)? {
        return Err(CoreError::DuplicateIdentifier(pending.id.clone()));
    }

    match tx.execute(
        "INSERT INTO records (id, payload) VALUES (?1, ?2)",
        params![&pending.id, &pending.blob],
    ) {
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            return Err(CoreError::DuplicateIdentifier(pending.id.clone()));
        }
        other => {
            other?;
        }
    }

    {
        let mut stmt = tx.prepare_cached(
            "INSERT OR IGNORE INTO postings (trapdoor, record_id, tag) VALUES (?1, ?2, ?3)",
        )?;
        for posting in &pending.postings {
            stmt.execute(params![
                posting.trapdoor.as_str(),
                &pending.id,
                posting.tag.as_ref().map(|t| t.as_slice()),
            ])?;
        }
    }

    tx.commit()?;
    Ok(())
}

/// All records posted under `trapdoor`, read in one statement
pub fn lookup_postings(conn: &Connection, trapdoor: &Trapdoor) -> rusqlite::Result<Vec<PostingHit>> {
    let mut stmt = conn.prepare_cached(
        r#"
        SELECT r.id, r.payload, p.tag
        FROM postings p
        JOIN records r ON r.id = p.record_id
        WHERE p.trapdoor = ?1
        ORDER BY r.id
        "#,
    )?;

    let rows = stmt.query_map([trapdoor.as_str()], |row| {
        Ok(PostingHit {
            record_id: row.get(0)?,
            blob: row.get(1)?,
            tag: row.get(2)?,
        })
    })?;
    let hits = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(hits)
}

/// Visit every posting as `(trapdoor, record_id, tag)`; returns how many were visited
pub fn for_each_posting<F>(conn: &Connection, mut visit: F) -> CoreResult<usize>
where
    F: FnMut(Trapdoor, String, Option<Vec<u8>>) -> CoreResult<()>,
{
    let mut stmt = conn.prepare("SELECT trapdoor, record_id, tag FROM postings")?;
    let mut rows = stmt.query([])?;
    let mut visited = 0;

    while let Some(row) = rows.next()? {
        let trapdoor: String = row.get(0)?;
        visit(Trapdoor::from_stored(trapdoor), row.get(1)?, row.get(2)?)?;
        visited += 1;
    }
    Ok(visited)
}
