use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Request-level error taxonomy. Every handler error is converted into a
/// uniform `{ "ok": false, "error": <message> }` body at the boundary; none
/// of these crash the serving process.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing request fields. Always user-correctable, no side
    /// effects have happened yet.
    #[error("{0}")]
    BadRequest(String),

    /// A required backend secret or endpoint is absent. Fatal per-request.
    #[error("{0}")]
    Config(String),

    /// The remote leaderboard service could not be reached.
    #[error("upstream_failed")]
    Upstream,

    /// A dependent call failed after validation passed.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "ok": false, "error": msg })))
                    .into_response()
            }
            AppError::Config(msg) | AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": msg })),
            )
                .into_response(),
            // The proxy relays upstream bodies verbatim on success, so its
            // failure shape stays distinct from the `{ok:false}` envelope.
            AppError::Upstream => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "upstream_failed" })),
            )
                .into_response(),
        }
    }
}
