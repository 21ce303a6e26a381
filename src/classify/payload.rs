//! Best-effort unwrapping of JSON error payloads.

use serde_json::{Map, Value};

use super::status::parse_status_line;

/// Structured error details pulled out of a provider's JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorPayload {
    /// HTTP status that prefixed the body or was embedded in it.
    pub http_code: Option<u16>,
    pub error_type: Option<String>,
    pub message: String,
    pub request_id: Option<String>,
}

impl ApiErrorPayload {
    /// A 4xx code or an `invalid_request_error` type.
    pub fn is_client_error(&self) -> bool {
        self.http_code.is_some_and(|code| (400..500).contains(&code))
            || self.error_type.as_deref() == Some("invalid_request_error")
    }
}

/// Parse `raw` as a provider error payload.
///
/// Accepts a bare JSON object or one preceded by an HTTP status prefix
/// (`HTTP 429: {...}`). The message is read from `error.message`, then the
/// top-level `message`. Returns `None` for anything else, including
/// malformed JSON.
pub fn parse_api_error_payload(raw: &str) -> Option<ApiErrorPayload> {
    let trimmed = raw.trim();
    let (prefix_code, body) = match parse_status_line(trimmed) {
        Some(line) if line.has_json_body() => (Some(line.code), line.rest),
        _ => (None, trimmed),
    };
    if !body.starts_with('{') {
        return None;
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => {
            tracing::trace!(error = %err, "error text is not a JSON payload");
            return None;
        }
    };
    let object = value.as_object()?;
    let error = object.get("error").and_then(Value::as_object);

    let message = error
        .and_then(|e| string_field(e, "message"))
        .or_else(|| string_field(object, "message"))?;

    // Anthropic wraps errors as {"type":"error","error":{...}}; the outer
    // type is only an envelope marker.
    let error_type = error
        .and_then(|e| string_field(e, "type"))
        .or_else(|| string_field(object, "type").filter(|t| t != "error"));

    let request_id = string_field(object, "request_id")
        .or_else(|| string_field(object, "requestId"))
        .or_else(|| error.and_then(|e| string_field(e, "request_id")));

    let http_code = prefix_code
        .or_else(|| error.and_then(|e| status_field(e, "code")))
        .or_else(|| error.and_then(|e| status_field(e, "status")))
        .or_else(|| status_field(object, "status"))
        .or_else(|| status_field(object, "code"));

    Some(ApiErrorPayload {
        http_code,
        error_type,
        message,
        request_id,
    })
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn status_field(object: &Map<String, Value>, key: &str) -> Option<u16> {
    object
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|code| u16::try_from(code).ok())
        .filter(|code| (100..=599).contains(code))
}
