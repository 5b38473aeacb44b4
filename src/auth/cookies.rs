// src/auth/cookies.rs
use astra::Request;

use crate::config::AuthConfig;

/// Value of the named cookie from the request's `Cookie` header(s).
pub fn read_cookie(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get_all("Cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
}

pub fn session_cookie(cfg: &AuthConfig, token: &str) -> String {
    build(cfg, token, cfg.session_ttl_secs)
}

pub fn clear_session_cookie(cfg: &AuthConfig) -> String {
    build(cfg, "", 0)
}

fn build(cfg: &AuthConfig, value: &str, max_age: i64) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        cfg.cookie_name, value, max_age
    );
    if cfg.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}
