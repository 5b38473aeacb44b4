// src/mutations/import.rs
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;

use crate::domain::validation::{summarize, validate_buyer};
use crate::domain::Actor;
use crate::errors::ServerError;
use crate::mutations::BuyerService;

pub const MAX_IMPORT_ROWS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// 1-based position in the submitted array.
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub inserted_count: usize,
    pub errors: Vec<RowError>,
}

impl BuyerService {
    /// Creates one buyer per valid row. Rows fail independently: a bad row is
    /// reported and skipped, the rest still go in.
    pub fn import(
        &self,
        conn: &mut Connection,
        actor: &Actor,
        payload: &Value,
    ) -> Result<ImportReport, ServerError> {
        let rows = payload
            .as_array()
            .ok_or_else(|| ServerError::BadRequest("Expected an array of rows".into()))?;

        if rows.len() > MAX_IMPORT_ROWS {
            return Err(ServerError::BadRequest(format!(
                "Too many rows: {} (max {MAX_IMPORT_ROWS})",
                rows.len()
            )));
        }

        let mut report = ImportReport {
            inserted_count: 0,
            errors: Vec::new(),
        };

        for (i, raw) in rows.iter().enumerate() {
            let row = i + 1;

            let input = match validate_buyer(raw) {
                Ok(input) => input,
                Err(errors) => {
                    report.errors.push(RowError {
                        row,
                        message: summarize(&errors),
                    });
                    continue;
                }
            };

            match self.insert_new(conn, actor, &input) {
                Ok(_) => report.inserted_count += 1,
                Err(e) => {
                    log::warn!("import row {row} failed to store: {e}");
                    report.errors.push(RowError {
                        row,
                        message: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "import by {}: {} inserted, {} rejected",
            actor.user_id,
            report.inserted_count,
            report.errors.len()
        );
        Ok(report)
    }
}
