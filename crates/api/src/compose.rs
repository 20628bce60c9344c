//! Renders orchestration outcomes as HTTP responses.
//!
//! | Outcome               | Status | Body                                |
//! |-----------------------|--------|-------------------------------------|
//! | `Success`             | 200*   | the success value                   |
//! | `NotFound`            | 404    | `{ "error": reason }`               |
//! | `UpstreamUnavailable` | 503    | `{ "detail": reason }`              |
//! | `Cancelled`           | 499    | `{ "detail": "request cancelled" }` |
//!
//! \* or the status the caller passes, e.g. 201 for a placed order.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orchestrator::Outcome;
use serde::Serialize;

/// Non-standard "client closed request" status.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Renders an outcome, using `success` as the status of the `Success` variant.
pub fn compose<T: Serialize>(outcome: Outcome<T>, success: StatusCode) -> Response {
    match outcome {
        Outcome::Success(value) => (success, Json(value)).into_response(),
        Outcome::NotFound(reason) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": reason })),
        )
            .into_response(),
        Outcome::UpstreamUnavailable(reason) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "detail": reason })),
        )
            .into_response(),
        Outcome::Cancelled => (
            client_closed_request(),
            Json(serde_json::json!({ "detail": "request cancelled" })),
        )
            .into_response(),
    }
}

fn client_closed_request() -> StatusCode {
    // 499 is within the valid 100..=999 range, so the fallback is never used.
    StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::REQUEST_TIMEOUT)
}
