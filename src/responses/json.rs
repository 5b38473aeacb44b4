use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use serde::Serialize;

pub fn json_response<T: Serialize>(status: u16, value: &T) -> ResultResp {
    let body = serde_json::to_string(value).map_err(|e| {
        log::error!("response serialization failed: {e}");
        ServerError::InternalError
    })?;

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .map_err(|_| ServerError::InternalError)
}

/// Same as [`json_response`], also setting a cookie.
pub fn json_response_with_cookie<T: Serialize>(status: u16, value: &T, cookie: &str) -> ResultResp {
    let mut resp = json_response(status, value)?;
    let header = cookie.parse().map_err(|_| ServerError::InternalError)?;
    resp.headers_mut().insert("set-cookie", header);
    Ok(resp)
}
