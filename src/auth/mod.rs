pub mod cookies;
pub mod password;
pub mod sessions;

use astra::Request;
use chrono::Utc;
use rusqlite::Connection;

use crate::config::AuthConfig;
use crate::domain::Actor;
use crate::errors::ServerError;

/// Resolves the session cookie to the acting user, or `Unauthorized`.
pub fn require_actor(req: &Request, conn: &Connection, cfg: &AuthConfig) -> Result<Actor, ServerError> {
    let token = cookies::read_cookie(req, &cfg.cookie_name).ok_or_else(ServerError::unauthenticated)?;
    sessions::load_actor_from_session(conn, &token, Utc::now().timestamp())?
        .ok_or_else(ServerError::unauthenticated)
}
