// src/db/users.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::actor::Role;
use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub role: Role,
}

/// Email should already be normalized by caller (trim/lowercase).
pub fn insert_user(
    conn: &Connection,
    id: &str,
    email: &str,
    name: Option<&str>,
    password_hash: &str,
    role: Role,
    now: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "insert into users (id, email, name, password_hash, role, created_at) values (?, ?, ?, ?, ?, ?)",
        params![id, email, name, password_hash, role, now],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            ServerError::Conflict("User already exists".into())
        }
        other => ServerError::Transient(format!("insert user failed: {other}")),
    })?;
    Ok(())
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>, ServerError> {
    conn.query_row(
        "select id, email, name, password_hash, role from users where email = ?",
        params![email],
        |r| {
            Ok(UserRow {
                id: r.get(0)?,
                email: r.get(1)?,
                name: r.get(2)?,
                password_hash: r.get(3)?,
                role: r.get(4)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::Transient(format!("select user failed: {e}")))
}
