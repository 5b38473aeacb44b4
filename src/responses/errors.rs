use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use serde_json::json;

/// Convert a ServerError into a JSON error response: `{error, kind}` plus
/// `errors` for validation failures.
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status();

    if status >= 500 {
        log::error!("request failed: {err}");
    }

    let body = match &err {
        ServerError::Validation(errors) => json!({
            "error": err.to_string(),
            "kind": err.kind(),
            "errors": errors,
        }),
        _ => json!({
            "error": err.to_string(),
            "kind": err.kind(),
        }),
    };

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body.to_string()))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
