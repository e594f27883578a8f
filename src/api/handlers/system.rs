//! System endpoints: health check and notification type catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Supported notification type info.
#[derive(Debug, Serialize, ToSchema)]
struct NotificationTypeInfo {
    notification_type: &'static str,
    description: &'static str,
    trigger: &'static str,
}

/// `GET /config/notification-types` — List supported notification types.
#[utoipa::path(
    get,
    path = "/config/notification-types",
    tag = "System",
    summary = "List supported notification types",
    description = "Returns metadata for every notification template the gateway can dispatch.",
    responses(
        (status = 200, description = "Notification type catalog", body = Vec<NotificationTypeInfo>),
    )
)]
pub async fn notification_types_handler() -> impl IntoResponse {
    let types = vec![
        NotificationTypeInfo {
            notification_type: "registration_confirmation",
            description: "Registration confirmed for an event",
            trigger: "admission below capacity, or promotion from the waitlist",
        },
        NotificationTypeInfo {
            notification_type: "waitlist_confirmation",
            description: "Registration placed on the waitlist",
            trigger: "admission while the event is at capacity",
        },
    ];
    (StatusCode::OK, Json(types))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/notification-types", get(notification_types_handler))
}
