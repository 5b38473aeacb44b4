// src/handlers/buyers.rs
use astra::Request;
use serde_json::json;

use crate::auth::require_actor;
use crate::domain::listing::ListQuery;
use crate::responses::{html_response, json_response, ResultResp};
use crate::router::{parse_query, read_json, AppContext};
use crate::spreadsheets::export_buyers_xlsx;
use crate::templates;

pub fn list(req: Request, ctx: &AppContext) -> ResultResp {
    ctx.db.with_conn(|conn| {
        require_actor(&req, conn, &ctx.settings.auth)?;
        let query = ListQuery::from_params(&parse_query(&req))?;
        let page = ctx.buyers.list(conn, &query)?;
        json_response(200, &page)
    })
}

pub fn create(req: Request, ctx: &AppContext) -> ResultResp {
    ctx.db.with_conn(|conn| {
        let actor = require_actor(&req, conn, &ctx.settings.auth)?;
        let payload = read_json(req)?;
        let buyer = ctx.buyers.create(conn, &actor, &payload)?;
        json_response(201, &buyer)
    })
}

pub fn get(req: Request, ctx: &AppContext, id: &str) -> ResultResp {
    ctx.db.with_conn(|conn| {
        require_actor(&req, conn, &ctx.settings.auth)?;
        let buyer = ctx.buyers.get_with_history(conn, id)?;
        json_response(200, &buyer)
    })
}

pub fn update(req: Request, ctx: &AppContext, id: &str) -> ResultResp {
    ctx.db.with_conn(|conn| {
        let actor = require_actor(&req, conn, &ctx.settings.auth)?;
        let payload = read_json(req)?;
        let buyer = ctx.buyers.update(conn, &actor, id, &payload)?;
        json_response(200, &buyer)
    })
}

pub fn change_status(req: Request, ctx: &AppContext, id: &str) -> ResultResp {
    ctx.db.with_conn(|conn| {
        let actor = require_actor(&req, conn, &ctx.settings.auth)?;
        let payload = read_json(req)?;
        let buyer = ctx.buyers.change_status(conn, &actor, id, &payload)?;
        json_response(200, &buyer)
    })
}

pub fn delete(req: Request, ctx: &AppContext, id: &str) -> ResultResp {
    ctx.db.with_conn(|conn| {
        let actor = require_actor(&req, conn, &ctx.settings.auth)?;
        ctx.buyers.delete(conn, &actor, id)?;
        json_response(200, &json!({ "success": true }))
    })
}

pub fn import(req: Request, ctx: &AppContext) -> ResultResp {
    ctx.db.with_conn(|conn| {
        let actor = require_actor(&req, conn, &ctx.settings.auth)?;
        let payload = read_json(req)?;
        let report = ctx.buyers.import(conn, &actor, &payload)?;
        json_response(201, &report)
    })
}

pub fn export(req: Request, ctx: &AppContext) -> ResultResp {
    let buyers = ctx.db.with_conn(|conn| {
        require_actor(&req, conn, &ctx.settings.auth)?;
        let query = ListQuery::from_params(&parse_query(&req))?;
        ctx.buyers.export(conn, &query.filter)
    })?;

    log::info!("exporting {} buyers", buyers.len());
    export_buyers_xlsx(&buyers)
}

/// HTML detail page; failures render as an HTML error page too.
pub fn view(req: Request, ctx: &AppContext, id: &str) -> ResultResp {
    let loaded = ctx.db.with_conn(|conn| {
        let actor = require_actor(&req, conn, &ctx.settings.auth)?;
        let buyer = ctx.buyers.get_with_history(conn, id)?;
        Ok((actor, buyer))
    });

    match loaded {
        Ok((actor, buyer)) => html_response(templates::pages::buyer_page(&buyer, &actor)),
        Err(err) => Ok(templates::html_error_response(err)),
    }
}
