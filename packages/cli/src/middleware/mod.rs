//! Middleware for panic recovery

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;
use uuid::Uuid;

type PanicHandler = fn(Box<dyn std::any::Any + Send + 'static>) -> Response;

/// Create a panic handler that returns consistent error responses
pub fn create_panic_handler() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(handle_panic as PanicHandler)
}

/// Handle panic with proper logging and sanitized response
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let code = Uuid::new_v4().simple().to_string();

    // Extract panic message safely
    let panic_message = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic occurred"
    };

    error!(code = %code, panic_message = %panic_message, "Server panic occurred");

    let body = json!({
        "status": 500,
        "message": "An internal server error occurred",
        "code": code
    });

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
