use crate::config::Settings;
use crate::db::Database;
use crate::errors::ServerError;
use crate::handlers::{auth, buyers};
use crate::mutations::BuyerService;
use crate::responses::ResultResp;
use astra::Request;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;

/// Largest request body accepted, in bytes. Bulk imports of 200 rows fit comfortably.
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// Everything a handler needs, shared by all worker threads.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub db: Database,
    pub settings: Settings,
    pub buyers: BuyerService,
}

impl AppContext {
    pub fn new(db: Database, settings: Settings) -> Self {
        let buyers = BuyerService::new(&settings);
        Self {
            db,
            settings,
            buyers,
        }
    }
}

pub fn handle(req: Request, ctx: &AppContext) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    log::debug!("{method} {path}");

    match (method.as_str(), segments.as_slice()) {
        ("POST", ["auth", "register"]) => auth::register(req, ctx),
        ("POST", ["auth", "login"]) => auth::login(req, ctx),
        ("GET", ["auth", "demo"]) => auth::demo(req, ctx),
        ("GET", ["auth", "me"]) => auth::me(req, ctx),
        ("POST", ["auth", "logout"]) => auth::logout(req, ctx),

        ("GET", ["buyers"]) => buyers::list(req, ctx),
        ("POST", ["buyers"]) => buyers::create(req, ctx),
        ("POST", ["buyers", "import"]) => buyers::import(req, ctx),
        ("GET", ["buyers", "export"]) => buyers::export(req, ctx),
        ("GET", ["buyers", id]) => buyers::get(req, ctx, id),
        ("PUT", ["buyers", id]) => buyers::update(req, ctx, id),
        ("DELETE", ["buyers", id]) => buyers::delete(req, ctx, id),
        ("PUT", ["buyers", id, "status"]) => buyers::change_status(req, ctx, id),
        ("GET", ["buyers", id, "view"]) => buyers::view(req, ctx, id),

        _ => Err(ServerError::NotFound),
    }
}

pub fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Reads and parses the request body as JSON.
pub fn read_json(req: Request) -> Result<Value, ServerError> {
    let mut raw = Vec::new();
    req.into_body()
        .reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut raw)
        .map_err(|e| ServerError::BadRequest(format!("Failed to read body: {e}")))?;

    if raw.len() as u64 > MAX_BODY_BYTES {
        return Err(ServerError::BadRequest("Request body too large".into()));
    }

    serde_json::from_slice(&raw).map_err(|_| ServerError::BadRequest("Invalid JSON body".into()))
}
