//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use serde_json::Value;

use crate::error::json_error;

/// Request and response bodies longer than this many characters are truncated
/// in `info` logs. The full body is logged at the `debug` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED: &str = "********";

/// The JSON fields whose values are never written to the logs.
const REDACTED_FIELDS: [&str; 2] = ["password", "token"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
///
/// Passwords, tokens and the `Authorization` header are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(body_bytes) => body_bytes,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return json_error(StatusCode::BAD_REQUEST, "could not read request body");
        }
    };

    tracing::info!(
        "Received request: {} {}\nheaders: {:#?}",
        parts.method,
        parts.uri,
        redact_headers(&parts.headers)
    );
    log_body("request", &body_bytes);

    let response = next
        .run(Request::from_parts(parts, Body::from(body_bytes)))
        .await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(body_bytes) => body_bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error");
        }
    };

    tracing::info!(
        "Sending response: {}\nheaders: {:#?}",
        parts.status,
        parts.headers
    );
    log_body("response", &body_bytes);

    Response::from_parts(parts, Body::from(body_bytes))
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    if headers.contains_key(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, HeaderValue::from_static(REDACTED));
    }

    headers
}

/// Replace the values of password and token fields in a JSON object body.
///
/// Bodies that are not JSON objects are returned unchanged.
fn redact_body(body_text: &str) -> String {
    let mut object = match serde_json::from_str::<Value>(body_text) {
        Ok(Value::Object(object)) => object,
        _ => return body_text.to_owned(),
    };

    let mut is_redacted = false;

    for field in REDACTED_FIELDS {
        if let Some(value) = object.get_mut(field) {
            *value = Value::String(REDACTED.to_owned());
            is_redacted = true;
        }
    }

    if is_redacted {
        Value::Object(object).to_string()
    } else {
        body_text.to_owned()
    }
}

/// Log a body with secrets redacted.
///
/// Only the logged copy is decoded, lossily. The bytes passed on to the
/// handler or client are never touched.
fn log_body(direction: &str, body_bytes: &Bytes) {
    let body = redact_body(&String::from_utf8_lossy(body_bytes));

    match body.char_indices().nth(LOG_BODY_LENGTH_LIMIT) {
        Some((cutoff, _)) => {
            tracing::info!("{direction} body: {}...", &body[..cutoff]);
            tracing::debug!("Full {direction} body: {body:?}");
        }
        None => tracing::info!("{direction} body: {body:?}"),
    }
}
