// src/db/rate_limit.rs
use rusqlite::{params, Connection};

use crate::config::RateLimitConfig;
use crate::errors::ServerError;

/// Sliding-window limiter backed by `request_log`.
///
/// Prunes entries older than the window, counts what remains for `key`, and
/// logs this request only when it is allowed. `now` is unix seconds.
pub fn check_rate_limit(
    conn: &Connection,
    cfg: &RateLimitConfig,
    key: &str,
    now: i64,
) -> Result<bool, ServerError> {
    let window_start = now - cfg.window_secs;

    conn.execute(
        "delete from request_log where created_at < ?",
        params![window_start],
    )
    .map_err(|e| ServerError::Transient(format!("prune request log failed: {e}")))?;

    let count: i64 = conn
        .query_row(
            "select count(*) from request_log where key = ? and created_at >= ?",
            params![key, window_start],
            |r| r.get(0),
        )
        .map_err(|e| ServerError::Transient(format!("count requests failed: {e}")))?;

    if count >= cfg.max_requests {
        return Ok(false);
    }

    conn.execute(
        "insert into request_log (key, created_at) values (?, ?)",
        params![key, now],
    )
    .map_err(|e| ServerError::Transient(format!("log request failed: {e}")))?;

    Ok(true)
}
