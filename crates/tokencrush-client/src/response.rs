//! Classification of raw service responses

use reqwest::StatusCode;
use serde_json::Value;
use tokencrush_core::{CrushResponse, Error, Result};

const MAX_MESSAGE_CHARS: usize = 200;

/// Keys an error payload may carry its message under, in lookup order.
const ERROR_KEYS: [&str; 3] = ["error", "detail", "message"];

/// Turn a status code and body into a crush result or a classified error.
pub(crate) fn interpret_response(status: u16, body: &str) -> Result<CrushResponse> {
    let parsed = serde_json::from_str::<Value>(body);

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .as_ref()
            .and_then(error_message)
            .or_else(|| snippet(body))
            .unwrap_or_else(|| reason(status));
        return Err(Error::service(Some(status), message));
    }

    let value = parsed.map_err(|e| {
        Error::validation(format!("response body is not valid JSON: {e}")).with_source(e)
    })?;

    // Some deployments answer 200 with an error envelope instead of a result.
    if value.get("optimized_prompt").is_none() {
        if let Some(message) = error_message(&value) {
            return Err(Error::service(Some(status), message));
        }
    }

    CrushResponse::from_value(value)
}

fn error_message(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    ERROR_KEYS.iter().find_map(|key| match object.get(*key)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(inner) => inner
            .get("message")
            .and_then(Value::as_str)
            .map(String::from)
            .or_else(|| Some(Value::Object(inner.clone()).to_string())),
        other => Some(other.to_string()),
    })
}

fn snippet(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let mut text: String = body.chars().take(MAX_MESSAGE_CHARS).collect();
    if body.chars().count() > MAX_MESSAGE_CHARS {
        text.push_str("...");
    }
    Some(text)
}

fn reason(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("unexpected status")
        .to_string()
}
