//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All endpoints are mounted under `/api/v1`.

pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// OpenAPI document aggregating every REST endpoint.
///
/// Served at `/api-docs/openapi.json` (with the Swagger UI at
/// `/swagger-ui`) when the `swagger-ui` feature is enabled.
#[derive(Debug, utoipa::OpenApi)]
#[openapi(
    info(description = "REST API for the Gather event discovery and registration service"),
    paths(
        handlers::event::create_event,
        handlers::event::list_events,
        handlers::event::get_event,
        handlers::event::update_event,
        handlers::event::delete_event,
        handlers::registration::create_registration,
        handlers::registration::list_registrations,
        handlers::registration::update_registration,
        handlers::registration::cancel_registration,
        handlers::registration::waitlist_position,
        handlers::registration::user_registrations,
        handlers::system::health_handler,
        handlers::system::notification_types_handler,
    ),
    tags(
        (name = "Events", description = "Event CRUD and discovery"),
        (name = "Registrations", description = "Admission, waitlist, and cancellation"),
        (name = "System", description = "Health and configuration"),
    )
)]
pub struct ApiDoc;
