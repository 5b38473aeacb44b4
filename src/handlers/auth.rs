// src/handlers/auth.rs
use astra::{Body, Request, ResponseBuilder};
use chrono::Utc;
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::cookies::{clear_session_cookie, read_cookie, session_cookie};
use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::auth::sessions::{create_session, revoke_session};
use crate::auth::require_actor;
use crate::db::users::{find_user_by_email, insert_user};
use crate::domain::actor::Role;
use crate::errors::{FieldError, ServerError};
use crate::responses::{json_response, json_response_with_cookie, ResultResp};
use crate::router::{read_json, AppContext};

#[derive(Debug, Deserialize)]
struct Credentials {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    name: Option<String>,
}

impl Credentials {
    fn from_body(req: Request) -> Result<Self, ServerError> {
        serde_json::from_value(read_json(req)?)
            .map_err(|_| ServerError::BadRequest("Expected {email, password}".into()))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_registration(creds: &Credentials) -> Result<String, ServerError> {
    let email = normalize_email(&creds.email);
    let mut errors = Vec::new();

    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        errors.push(FieldError::new("email", "Invalid email address"));
    }
    if creds.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }

    if errors.is_empty() {
        Ok(email)
    } else {
        Err(ServerError::Validation(errors))
    }
}

/// Opens a session for the user and answers with its cookie.
fn signed_in(
    conn: &Connection,
    ctx: &AppContext,
    status: u16,
    user_id: &str,
    role: Role,
) -> ResultResp {
    let token = create_session(conn, user_id, Utc::now().timestamp(), ctx.settings.auth.session_ttl_secs)?;
    json_response_with_cookie(
        status,
        &json!({ "userId": user_id, "userRole": role }),
        &session_cookie(&ctx.settings.auth, &token),
    )
}

pub fn register(req: Request, ctx: &AppContext) -> ResultResp {
    let creds = Credentials::from_body(req)?;
    let email = validate_registration(&creds)?;
    let hash = hash_password(&creds.password)?;

    ctx.db.with_conn(|conn| {
        let id = Uuid::new_v4().to_string();
        insert_user(
            conn,
            &id,
            &email,
            creds.name.as_deref().map(str::trim).filter(|n| !n.is_empty()),
            &hash,
            Role::User,
            Utc::now().timestamp(),
        )?;
        log::info!("registered user {id}");
        signed_in(conn, ctx, 201, &id, Role::User)
    })
}

pub fn login(req: Request, ctx: &AppContext) -> ResultResp {
    let creds = Credentials::from_body(req)?;
    let email = normalize_email(&creds.email);

    ctx.db.with_conn(|conn| {
        let user = find_user_by_email(conn, &email)?
            .filter(|u| verify_password(&creds.password, &u.password_hash))
            .ok_or_else(|| ServerError::Unauthorized("Invalid email or password".into()))?;

        log::info!("user {} signed in", user.id);
        signed_in(conn, ctx, 200, &user.id, user.role)
    })
}

/// Signs in as the shared demo account, creating it on first use.
pub fn demo(_req: Request, ctx: &AppContext) -> ResultResp {
    let cfg = &ctx.settings.auth;
    let email = normalize_email(&cfg.demo_email);

    ctx.db.with_conn(|conn| {
        let (user_id, role) = match find_user_by_email(conn, &email)? {
            Some(user) => (user.id, user.role),
            None => {
                let id = Uuid::new_v4().to_string();
                let hash = hash_password(&cfg.demo_password)?;
                insert_user(conn, &id, &email, Some("Demo User"), &hash, Role::Admin, Utc::now().timestamp())?;
                log::info!("created demo user {id}");
                (id, Role::Admin)
            }
        };
        signed_in(conn, ctx, 200, &user_id, role)
    })
}

pub fn me(req: Request, ctx: &AppContext) -> ResultResp {
    let actor = ctx
        .db
        .with_conn(|conn| require_actor(&req, conn, &ctx.settings.auth))?;

    json_response(
        200,
        &json!({ "userId": actor.user_id, "userRole": actor.role, "email": actor.email }),
    )
}

pub fn logout(req: Request, ctx: &AppContext) -> ResultResp {
    let cfg = &ctx.settings.auth;

    if let Some(token) = read_cookie(&req, &cfg.cookie_name) {
        ctx.db
            .with_conn(|conn| revoke_session(conn, &token, Utc::now().timestamp()))?;
    }

    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .header("Set-Cookie", clear_session_cookie(cfg))
        .body(Body::from(json!({ "success": true }).to_string()))
        .map_err(|_| ServerError::InternalError)
}
