// ABOUTME: Request and response envelopes for the tag API
// ABOUTME: Wraps bodies under a named top-level key and unwraps incoming ones

use axum::{extract::rejection::JsonRejection, Json};
use quillpad_tags::Tag;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppError;

/// `{"tag": {...}}`
#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub tag: Tag,
}

/// `{"tags": [...], "total": N}` where `total` ignores pagination
#[derive(Debug, Serialize)]
pub struct TagListResponse {
    pub tags: Vec<Tag>,
    pub total: i64,
}

/// Take the JSON object stored under `key` out of a request body
pub fn unwrap_envelope(
    payload: Result<Json<Value>, JsonRejection>,
    key: &str,
) -> Result<Map<String, Value>, AppError> {
    let Json(body) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    match body {
        Value::Object(mut fields) => match fields.remove(key) {
            Some(Value::Object(inner)) => Ok(inner),
            _ => Err(missing_envelope(key)),
        },
        _ => Err(missing_envelope(key)),
    }
}

fn missing_envelope(key: &str) -> AppError {
    AppError::BadRequest(format!(
        "Request body must be a JSON object with a '{}' object",
        key
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope() {
        let inner = unwrap_envelope(Ok(Json(json!({"tag": {"name": "db"}}))), "tag").unwrap();
        assert_eq!(inner.get("name"), Some(&json!("db")));
    }

    #[test]
    fn test_missing_or_wrong_envelope() {
        for body in [json!({}), json!({"tag": "db"}), json!(["tag"]), json!({"tags": {}})] {
            let err = unwrap_envelope(Ok(Json(body)), "tag").unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }
}
