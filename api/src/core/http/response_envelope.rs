use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use report_core::ReplyEnvelope;

/// `200 {status:"success", data}`.
pub fn reply_success(data: impl Into<String>) -> Response {
    (StatusCode::OK, Json(ReplyEnvelope::success(data))).into_response()
}

/// `{status:"error", message}` with the given HTTP status.
pub fn reply_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ReplyEnvelope::error(message))).into_response()
}
