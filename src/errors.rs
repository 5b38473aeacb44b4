use astra::Response;
use serde::Serialize;
use thiserror::Error;

/// A single schema violation, addressed by the JSON path of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors originating from either the server logic
/// (routing, validation, authorization) or downstream layers (DB).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("You are not allowed to modify this buyer")]
    Forbidden,

    #[error("Not Found")]
    NotFound,

    #[error("This buyer was changed by someone else. Reload the latest version before saving again.")]
    StaleWrite,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Too many requests, please try again later.")]
    RateLimited,

    #[error("Temporary storage failure, please retry: {0}")]
    Transient(String),

    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),

    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::Validation(_) | ServerError::BadRequest(_) => 400,
            ServerError::Unauthorized(_) => 401,
            ServerError::Forbidden => 403,
            ServerError::NotFound => 404,
            ServerError::StaleWrite | ServerError::Conflict(_) => 409,
            ServerError::RateLimited => 429,
            ServerError::Transient(_) => 503,
            ServerError::XlsxError(_) | ServerError::InternalError => 500,
        }
    }

    /// Stable machine-readable name of the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::Validation(_) => "validation",
            ServerError::BadRequest(_) => "bad_request",
            ServerError::Unauthorized(_) => "unauthenticated",
            ServerError::Forbidden => "forbidden",
            ServerError::NotFound => "not_found",
            ServerError::StaleWrite => "stale_write",
            ServerError::Conflict(_) => "conflict",
            ServerError::RateLimited => "rate_limited",
            ServerError::Transient(_) => "transient_failure",
            ServerError::XlsxError(_) | ServerError::InternalError => "internal",
        }
    }

    pub fn unauthenticated() -> Self {
        ServerError::Unauthorized("User not authenticated".into())
    }
}

impl From<rusqlite::Error> for ServerError {
    fn from(err: rusqlite::Error) -> Self {
        ServerError::Transient(err.to_string())
    }
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
