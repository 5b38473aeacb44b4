// src/domain/history.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::buyer::Buyer;
use crate::domain::diff::Diff;

/// What a history entry records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum HistoryPayload {
    /// Full snapshot of the buyer as first stored.
    #[serde(rename = "CREATE")]
    Create {
        #[serde(rename = "newValues")]
        new_values: Box<Buyer>,
    },
    /// Field-level changes of one update.
    #[serde(rename = "UPDATE")]
    Update { changes: Diff },
}

impl HistoryPayload {
    pub fn action(&self) -> &'static str {
        match self {
            HistoryPayload::Create { .. } => "CREATE",
            HistoryPayload::Update { .. } => "UPDATE",
        }
    }

    /// Human-readable lines for display.
    pub fn describe(&self) -> Vec<String> {
        match self {
            HistoryPayload::Create { new_values } => {
                vec![format!("Created lead for {}", new_values.fields.full_name)]
            }
            HistoryPayload::Update { changes } => changes
                .iter()
                .map(|(field, change)| change.describe(field))
                .collect(),
        }
    }
}

/// Immutable audit record of one buyer mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub buyer_id: String,
    pub changed_by: String,
    /// Equal to the buyer's `updatedAt` after the mutation.
    #[serde(with = "crate::domain::timestamp")]
    pub changed_at: DateTime<Utc>,
    pub diff: HistoryPayload,
}

/// A buyer together with its most recent history, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerWithHistory {
    #[serde(flatten)]
    pub buyer: Buyer,
    pub history: Vec<HistoryEntry>,
}
