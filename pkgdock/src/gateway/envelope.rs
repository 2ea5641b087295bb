//! Lenient decoding of the store's JSON response envelope.
//!
//! Every JSON body the gateway serves carries a `success` boolean plus either
//! a payload or an `error` message. Some deployments sit behind an
//! intermediary that appends trailing non-JSON bytes to responses; decoding
//! first tries the full text, then retries after truncating at the last
//! closing brace or bracket.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{GatewayError, GatewayResult};

/// Parse a response body into a JSON value, tolerating trailing junk.
pub(crate) fn parse_lenient(body: &str) -> GatewayResult<Value> {
    let trimmed = body.trim();
    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            let cut = trimmed
                .rfind('}')
                .into_iter()
                .chain(trimmed.rfind(']'))
                .max();
            match cut {
                Some(idx) => serde_json::from_str(&trimmed[..=idx]).map_err(|_| {
                    GatewayError::InvalidResponse(format!(
                        "unparseable body: {}",
                        preview(trimmed)
                    ))
                }),
                None => Err(GatewayError::InvalidResponse(first_err.to_string())),
            }
        }
    }
}

/// Check the envelope's `success` flag.
///
/// A `success: false` body becomes [`GatewayError::Rejected`] carrying the
/// server's `error` message, or `fallback` when the server sent none. A
/// missing `success` field is treated as rejection too: the envelope is part
/// of the contract.
pub(crate) fn require_success(value: &Value, fallback: &str) -> GatewayResult<()> {
    if value.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(());
    }
    let message = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string();
    Err(GatewayError::Rejected(message))
}

/// Decode the payload under `field` from a successful envelope.
pub(crate) fn decode_field<T: DeserializeOwned>(
    body: &str,
    field: &str,
    fallback: &str,
) -> GatewayResult<T> {
    let value = parse_lenient(body)?;
    require_success(&value, fallback)?;
    let payload = value
        .get(field)
        .cloned()
        .unwrap_or(Value::Null);
    serde_json::from_value(payload).map_err(|e| {
        GatewayError::InvalidResponse(format!("bad '{}' payload: {}", field, e))
    })
}

/// Decode an envelope that carries no payload (mutation acknowledgements).
pub(crate) fn decode_ack(body: &str, fallback: &str) -> GatewayResult<()> {
    let value = parse_lenient(body)?;
    require_success(&value, fallback)
}

/// Decode a body that is itself the payload (the per-package check endpoint
/// responds with `{valid, check_time}` at the top level).
pub(crate) fn decode_bare<T: DeserializeOwned>(body: &str) -> GatewayResult<T> {
    let value = parse_lenient(body)?;
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = value
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_string();
        return Err(GatewayError::Rejected(message));
    }
    serde_json::from_value(value)
        .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
}

fn preview(body: &str) -> String {
    const LIMIT: usize = 40;
    if body.len() <= LIMIT {
        body.to_string()
    } else {
        let mut end = LIMIT;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    }
}
