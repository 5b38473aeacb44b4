use crate::config::Settings;
use crate::db::connection::{init_db, Database};
use crate::responses::error_to_response;
use crate::router::{handle, AppContext};
use anyhow::Context;
use astra::Server;
use std::net::SocketAddr;
use std::time::Duration;

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod handlers;
mod mutations;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() -> anyhow::Result<()> {
    // 1️⃣ Load settings (file + env), then logging
    let settings = Settings::load().context("failed to load settings")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.server.log_level.as_str()),
    )
    .init();

    // 2️⃣ Create the database handle and apply the schema
    let db = Database::new(settings.database.path.clone())
        .with_busy_timeout(Duration::from_millis(settings.database.busy_timeout_ms));

    init_db(&db, &settings.database.schema_path)
        .with_context(|| format!("database initialization failed for {}", db.path()))?;

    // 3️⃣ Start the server
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("invalid server.host / server.port")?;
    log::info!("Starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(settings.server.max_workers);
    let ctx = AppContext::new(db, settings);

    // 4️⃣ Serve requests, passing the shared context into the closure
    server
        .serve(move |req, _info| match handle(req, &ctx) {
            Ok(resp) => resp,
            Err(err) => error_to_response(err),
        })
        .context("server ended with error")?;

    log::info!("Server shut down cleanly.");
    Ok(())
}
