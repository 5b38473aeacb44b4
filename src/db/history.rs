// src/db/history.rs
use rusqlite::{params, Connection, Row};

use crate::domain::history::{HistoryEntry, HistoryPayload};
use crate::domain::timestamp;
use crate::errors::ServerError;

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    let diff_json: String = row.get(4)?;
    let diff: HistoryPayload = serde_json::from_str(&diff_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let changed_at_ms: i64 = row.get(3)?;
    let changed_at = timestamp::from_millis(changed_at_ms).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Integer,
            format!("timestamp out of range: {changed_at_ms}").into(),
        )
    })?;

    Ok(HistoryEntry {
        id: row.get(0)?,
        buyer_id: row.get(1)?,
        changed_by: row.get(2)?,
        changed_at,
        diff,
    })
}

/// Appends one entry. Entries are never updated afterwards.
pub fn insert_history(conn: &Connection, entry: &HistoryEntry) -> Result<(), ServerError> {
    let diff_json = serde_json::to_string(&entry.diff).map_err(|_| ServerError::InternalError)?;

    conn.execute(
        r#"
        INSERT INTO buyer_history (id, buyer_id, changed_by, changed_at, diff)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![
            &entry.id,
            &entry.buyer_id,
            &entry.changed_by,
            entry.changed_at.timestamp_millis(),
            diff_json,
        ],
    )?;
    Ok(())
}

/// Most recent entries for a buyer, newest first.
pub fn recent_history(
    conn: &Connection,
    buyer_id: &str,
    limit: usize,
) -> Result<Vec<HistoryEntry>, ServerError> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, buyer_id, changed_by, changed_at, diff
        FROM buyer_history
        WHERE buyer_id = ?1
        ORDER BY changed_at DESC, rowid DESC
        LIMIT ?2
        "#,
    )?;
    let rows = stmt.query_map(params![buyer_id, limit as i64], row_to_entry)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(ServerError::from)
}

pub fn count_history(conn: &Connection, buyer_id: &str) -> Result<i64, ServerError> {
    conn.query_row(
        "SELECT COUNT(*) FROM buyer_history WHERE buyer_id = ?1",
        params![buyer_id],
        |r| r.get(0),
    )
    .map_err(ServerError::from)
}
