//! HTTP surface of the service.

mod health;
mod notifications;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/notifications", post(notifications::send_notification))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
