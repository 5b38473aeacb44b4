// src/db/buyers.rs
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::domain::buyer::{Buyer, BuyerInput};
use crate::domain::listing::{BuyerFilter, ListQuery};
use crate::domain::timestamp;
use crate::errors::ServerError;

const BUYER_COLUMNS: &str = r#"
    id, owner_id, full_name, email, phone, city, property_type, bhk, purpose,
    budget_min, budget_max, timeline, source, notes, tags, status, created_at, updated_at
"#;

fn millis_to_ts(idx: usize, ms: i64) -> rusqlite::Result<DateTime<Utc>> {
    timestamp::from_millis(ms).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Integer,
            format!("timestamp out of range: {ms}").into(),
        )
    })
}

fn row_to_buyer(row: &Row<'_>) -> rusqlite::Result<Buyer> {
    let tags_json: String = row.get(14)?;
    let tags: Vec<String> = serde_json::from_str(&tags_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(14, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Buyer {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        fields: BuyerInput {
            full_name: row.get(2)?,
            email: row.get(3)?,
            phone: row.get(4)?,
            city: row.get(5)?,
            property_type: row.get(6)?,
            bhk: row.get(7)?,
            purpose: row.get(8)?,
            budget_min: row.get(9)?,
            budget_max: row.get(10)?,
            timeline: row.get(11)?,
            source: row.get(12)?,
            notes: row.get(13)?,
            tags,
            status: row.get(15)?,
        },
        created_at: millis_to_ts(16, row.get(16)?)?,
        updated_at: millis_to_ts(17, row.get(17)?)?,
    })
}

fn tags_to_json(tags: &[String]) -> Result<String, ServerError> {
    serde_json::to_string(tags).map_err(|_| ServerError::InternalError)
}

/// Inserts a new buyer row. `created_at` and `updated_at` both start at `now`.
pub fn insert_buyer(
    conn: &Connection,
    id: &str,
    owner_id: &str,
    input: &BuyerInput,
    now: DateTime<Utc>,
) -> Result<Buyer, ServerError> {
    let tags = tags_to_json(&input.tags)?;
    let ms = now.timestamp_millis();

    conn.execute(
        r#"
        INSERT INTO buyers (
            id, owner_id, full_name, email, phone, city, property_type, bhk, purpose,
            budget_min, budget_max, timeline, source, notes, tags, status, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
        "#,
        params![
            id,
            owner_id,
            &input.full_name,
            &input.email,
            &input.phone,
            input.city,
            input.property_type,
            input.bhk,
            input.purpose,
            input.budget_min,
            input.budget_max,
            input.timeline,
            input.source,
            &input.notes,
            tags,
            input.status,
            ms,
            ms,
        ],
    )?;

    find_buyer(conn, id)?.ok_or(ServerError::InternalError)
}

pub fn find_buyer(conn: &Connection, id: &str) -> Result<Option<Buyer>, ServerError> {
    let sql = format!("SELECT {BUYER_COLUMNS} FROM buyers WHERE id = ?1");
    conn.query_row(&sql, params![id], row_to_buyer)
        .optional()
        .map_err(ServerError::from)
}

/// Overwrites the editable fields of a buyer, but only if it is still at
/// `expected_updated_at`. Returns `false` when no row matched, i.e. the buyer
/// is gone or someone else wrote first.
pub fn update_buyer_if_unchanged(
    conn: &Connection,
    id: &str,
    input: &BuyerInput,
    expected_updated_at: DateTime<Utc>,
    new_updated_at: DateTime<Utc>,
) -> Result<bool, ServerError> {
    let tags = tags_to_json(&input.tags)?;

    let updated = conn.execute(
        r#"
        UPDATE buyers SET
            full_name = ?1, email = ?2, phone = ?3, city = ?4, property_type = ?5, bhk = ?6,
            purpose = ?7, budget_min = ?8, budget_max = ?9, timeline = ?10, source = ?11,
            notes = ?12, tags = ?13, status = ?14, updated_at = ?15
        WHERE id = ?16 AND updated_at = ?17
        "#,
        params![
            &input.full_name,
            &input.email,
            &input.phone,
            input.city,
            input.property_type,
            input.bhk,
            input.purpose,
            input.budget_min,
            input.budget_max,
            input.timeline,
            input.source,
            &input.notes,
            tags,
            input.status,
            new_updated_at.timestamp_millis(),
            id,
            expected_updated_at.timestamp_millis(),
        ],
    )?;

    Ok(updated == 1)
}

/// Deletes a buyer; its history goes with it through the foreign key.
pub fn delete_buyer(conn: &Connection, id: &str) -> Result<bool, ServerError> {
    let deleted = conn.execute("DELETE FROM buyers WHERE id = ?1", params![id])?;
    Ok(deleted == 1)
}

/// WHERE clause and its positional values for a filter.
fn filter_clause(filter: &BuyerFilter) -> (String, Vec<String>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<String> = Vec::new();

    let mut push = |clause: &str, value: String| {
        values.push(value);
        clauses.push(clause.replace('?', &format!("?{}", values.len())));
    };

    if let Some(city) = filter.city {
        push("city = ?", city.as_str().to_string());
    }
    if let Some(pt) = filter.property_type {
        push("property_type = ?", pt.as_str().to_string());
    }
    if let Some(status) = filter.status {
        push("status = ?", status.as_str().to_string());
    }
    if let Some(timeline) = filter.timeline {
        push("timeline = ?", timeline.as_str().to_string());
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        push(
            "(full_name LIKE ? ESCAPE '\\' OR phone LIKE ? ESCAPE '\\' OR IFNULL(email, '') LIKE ? ESCAPE '\\')",
            pattern,
        );
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!("WHERE {}", clauses.join(" AND ")), values)
    }
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub fn count_buyers(conn: &Connection, filter: &BuyerFilter) -> Result<i64, ServerError> {
    let (where_sql, values) = filter_clause(filter);
    let sql = format!("SELECT COUNT(*) FROM buyers {where_sql}");
    conn.query_row(&sql, params_from_iter(values.iter()), |r| r.get(0))
        .map_err(ServerError::from)
}

/// One page of buyers matching the query, in the requested order.
pub fn list_buyers(conn: &Connection, query: &ListQuery) -> Result<Vec<Buyer>, ServerError> {
    let (where_sql, values) = filter_clause(&query.filter);
    let sql = format!(
        "SELECT {BUYER_COLUMNS} FROM buyers {where_sql} ORDER BY {} {}, id ASC LIMIT {} OFFSET {}",
        query.sort_by.column(),
        query.sort_order.sql(),
        query.page_size,
        query.offset(),
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), row_to_buyer)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(ServerError::from)
}

/// Every buyer matching the filter, most recently updated first, up to `limit`.
pub fn export_buyers(
    conn: &Connection,
    filter: &BuyerFilter,
    limit: i64,
) -> Result<Vec<Buyer>, ServerError> {
    let (where_sql, values) = filter_clause(filter);
    let sql = format!(
        "SELECT {BUYER_COLUMNS} FROM buyers {where_sql} ORDER BY updated_at DESC, id ASC LIMIT {limit}"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), row_to_buyer)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(ServerError::from)
}
