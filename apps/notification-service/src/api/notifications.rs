//! Direct HTTP ingress for notification events.

use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain_notifications::{EventPayload, NotificationError};
use serde_json::json;
use tracing::error;

/// `POST /notifications`
///
/// Accepts the same payload the broker subscription carries and runs it
/// through the same dispatch pipeline, synchronously. Validation
/// failures come back as 400 with per-field detail; pipeline failures
/// as 500.
pub async fn send_notification(
    State(state): State<AppState>,
    Json(event): Json<EventPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.dispatcher.dispatch(&event).await?;
    Ok(Json(json!({ "ok": true })))
}

pub struct ApiError(NotificationError);

impl From<NotificationError> for ApiError {
    fn from(err: NotificationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            NotificationError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "BadRequest",
                    "message": "payload validation failed",
                    "details": e.errors,
                })),
            )
                .into_response(),
            other => {
                error!(error = %other, "Notification dispatch failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "InternalServerError",
                        "message": "failed to send notification",
                    })),
                )
                    .into_response()
            }
        }
    }
}
