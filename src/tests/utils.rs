use crate::auth::sessions::create_session;
use crate::config::Settings;
use crate::db::connection::test_support::{insert_user, SCHEMA_SQL};
use crate::db::Database;
use crate::router::{handle, AppContext};
use astra::{Body, Response};
use chrono::Utc;
use http::{Method, Request};
use serde_json::Value;
use std::io::Read;
use tempfile::TempDir;

/// A fresh database in its own temp directory. Keep the `TempDir` alive for
/// the duration of the test.
pub fn init_test_app(settings: Settings) -> (TempDir, AppContext) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.sqlite3").to_string_lossy().to_string();
    let db = Database::new(path);

    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    })
    .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    (dir, AppContext::new(db, settings))
}

/// Inserts a user with the given role and returns a `Cookie` header value.
pub fn sign_in(ctx: &AppContext, user_id: &str, role: &str) -> String {
    let token = ctx
        .db
        .with_conn(|conn| {
            insert_user(conn, user_id, role);
            create_session(conn, user_id, Utc::now().timestamp(), 3600)
        })
        .expect("Failed to create session");
    format!("{}={}", ctx.settings.auth.cookie_name, token)
}

/// Runs a request through the router, rendering errors the way the server does.
pub fn send(
    ctx: &AppContext,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<&Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("Cookie", cookie);
    }
    let body = match body {
        Some(json) => Body::from(json.to_string()),
        None => Body::empty(),
    };

    match handle(builder.body(body).unwrap(), ctx) {
        Ok(resp) => resp,
        Err(err) => crate::responses::error_to_response(err),
    }
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn body_json(resp: Response) -> Value {
    serde_json::from_str(&body_string(resp)).unwrap()
}

/// The `name=value` part of a response's `Set-Cookie` header.
pub fn cookie_from(resp: &Response) -> String {
    resp.headers()
        .get("Set-Cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .unwrap_or("")
        .to_string()
}
