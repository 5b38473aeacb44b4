// src/domain/concurrency.rs

use chrono::{DateTime, Utc};

use crate::errors::ServerError;

/// Outcome of comparing the stored last-modified timestamp with the one the
/// caller read before editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Allowed,
    Conflict,
}

/// The caller may write only if it saw exactly the stored version.
pub fn check_and_proceed(stored: &DateTime<Utc>, client_supplied: &DateTime<Utc>) -> Guard {
    if stored == client_supplied {
        Guard::Allowed
    } else {
        Guard::Conflict
    }
}

impl Guard {
    pub fn into_result(self) -> Result<(), ServerError> {
        match self {
            Guard::Allowed => Ok(()),
            Guard::Conflict => Err(ServerError::StaleWrite),
        }
    }
}
