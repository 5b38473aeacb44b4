// src/mutations/coordinator.rs

//! Every write to a buyer goes through [`BuyerService`].
//!
//! A mutation runs as one unit of work: the concurrency guard, the row write,
//! the diff and the history entry either all commit or none do. Any `?` before
//! `commit()` drops the unit of work, which rolls it back.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde_json::Value;
use uuid::Uuid;

use crate::config::{RateLimitConfig, Settings};
use crate::db::buyers::{
    count_buyers, delete_buyer, export_buyers, find_buyer, insert_buyer, list_buyers,
    update_buyer_if_unchanged,
};
use crate::db::history::recent_history;
use crate::db::rate_limit::check_rate_limit;
use crate::db::UnitOfWork;
use crate::domain::concurrency::check_and_proceed;
use crate::domain::diff::compute_diff;
use crate::domain::listing::{BuyerFilter, ListQuery, Paginated};
use crate::domain::timestamp;
use crate::domain::validation::{validate_buyer, validate_status_change, validate_update};
use crate::domain::{Actor, Buyer, BuyerInput, BuyerWithHistory};
use crate::errors::ServerError;
use crate::mutations::recorder::{record_creation, record_update};

/// Upper bound on rows in one spreadsheet export.
pub const EXPORT_LIMIT: i64 = 10_000;

#[derive(Debug, Clone)]
pub struct BuyerService {
    history_limit: usize,
    rate_limit: RateLimitConfig,
}

impl BuyerService {
    pub fn new(settings: &Settings) -> Self {
        Self {
            history_limit: settings.history.recent_limit,
            rate_limit: settings.rate_limit.clone(),
        }
    }

    pub fn create(
        &self,
        conn: &mut Connection,
        actor: &Actor,
        payload: &Value,
    ) -> Result<Buyer, ServerError> {
        let key = format!("create:{}", actor.user_id);
        if !check_rate_limit(conn, &self.rate_limit, &key, Utc::now().timestamp())? {
            log::warn!("rate limit hit for {}", actor.user_id);
            return Err(ServerError::RateLimited);
        }

        let input = validate_buyer(payload).map_err(ServerError::Validation)?;
        self.insert_new(conn, actor, &input)
    }

    /// Insert plus CREATE entry in a unit of work of its own.
    pub(crate) fn insert_new(
        &self,
        conn: &mut Connection,
        actor: &Actor,
        input: &BuyerInput,
    ) -> Result<Buyer, ServerError> {
        let uow = UnitOfWork::begin(conn)?;

        let id = Uuid::new_v4().to_string();
        let buyer = insert_buyer(uow.conn(), &id, &actor.user_id, input, timestamp::now_millis())?;
        record_creation(&uow, &buyer, actor)?;

        uow.commit()?;
        log::info!("buyer {} created by {}", buyer.id, actor.user_id);
        Ok(buyer)
    }

    /// Full-record update guarded by the `updatedAt` the caller last read.
    pub fn update(
        &self,
        conn: &mut Connection,
        actor: &Actor,
        id: &str,
        payload: &Value,
    ) -> Result<BuyerWithHistory, ServerError> {
        let request = validate_update(payload).map_err(ServerError::Validation)?;
        let input = request.input;
        self.apply(conn, actor, id, request.expected_updated_at, move |_| input)
    }

    /// Status-only change; otherwise the same path as [`BuyerService::update`].
    pub fn change_status(
        &self,
        conn: &mut Connection,
        actor: &Actor,
        id: &str,
        payload: &Value,
    ) -> Result<BuyerWithHistory, ServerError> {
        let change = validate_status_change(payload).map_err(ServerError::Validation)?;
        self.apply(conn, actor, id, change.expected_updated_at, |stored| BuyerInput {
            status: change.status,
            ..stored.fields.clone()
        })
    }

    fn apply<F>(
        &self,
        conn: &mut Connection,
        actor: &Actor,
        id: &str,
        expected_updated_at: DateTime<Utc>,
        build: F,
    ) -> Result<BuyerWithHistory, ServerError>
    where
        F: FnOnce(&Buyer) -> BuyerInput,
    {
        let uow = UnitOfWork::begin(conn)?;

        let stored = find_buyer(uow.conn(), id)?.ok_or(ServerError::NotFound)?;
        if !actor.may_modify(&stored.owner_id) {
            log::warn!("{} denied update of buyer {}", actor.user_id, id);
            return Err(ServerError::Forbidden);
        }

        if let Err(e) = check_and_proceed(&stored.updated_at, &expected_updated_at).into_result() {
            log::warn!(
                "stale write on buyer {id}: stored {}, client {}",
                timestamp::format(&stored.updated_at),
                timestamp::format(&expected_updated_at)
            );
            return Err(e);
        }

        let next = build(&stored).normalize();
        let new_updated_at = timestamp::next_after(&stored.updated_at);

        if !update_buyer_if_unchanged(uow.conn(), id, &next, stored.updated_at, new_updated_at)? {
            log::warn!("stale write on buyer {id}: row changed under the lock");
            return Err(ServerError::StaleWrite);
        }

        let diff = compute_diff(&stored.fields, &next);
        let changed = diff.len();
        record_update(&uow, id, actor, diff, new_updated_at)?;

        let result = self.get_with_history(uow.conn(), id)?;
        uow.commit()?;

        log::info!("buyer {id} updated by {} ({changed} fields changed)", actor.user_id);
        Ok(result)
    }

    pub fn delete(&self, conn: &mut Connection, actor: &Actor, id: &str) -> Result<(), ServerError> {
        let uow = UnitOfWork::begin(conn)?;

        let stored = find_buyer(uow.conn(), id)?.ok_or(ServerError::NotFound)?;
        if !actor.may_modify(&stored.owner_id) {
            log::warn!("{} denied delete of buyer {}", actor.user_id, id);
            return Err(ServerError::Forbidden);
        }

        if !delete_buyer(uow.conn(), id)? {
            return Err(ServerError::NotFound);
        }

        uow.commit()?;
        log::info!("buyer {id} deleted by {}", actor.user_id);
        Ok(())
    }

    /// The buyer plus its most recent history entries, newest first.
    pub fn get_with_history(
        &self,
        conn: &Connection,
        id: &str,
    ) -> Result<BuyerWithHistory, ServerError> {
        let buyer = find_buyer(conn, id)?.ok_or(ServerError::NotFound)?;
        let history = recent_history(conn, id, self.history_limit)?;
        Ok(BuyerWithHistory { buyer, history })
    }

    pub fn list(&self, conn: &Connection, query: &ListQuery) -> Result<Paginated<Buyer>, ServerError> {
        let total = count_buyers(conn, &query.filter)?;
        let data = list_buyers(conn, query)?;
        Ok(Paginated::new(data, total, query))
    }

    pub fn export(&self, conn: &Connection, filter: &BuyerFilter) -> Result<Vec<Buyer>, ServerError> {
        export_buyers(conn, filter, EXPORT_LIMIT)
    }
}
