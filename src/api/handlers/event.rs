//! Event CRUD handlers: create, list, get, update, delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{
    CreateEventRequest, CreateEventResponse, EventDetailResponse, EventFilterParams,
    EventListResponse, EventSummaryDto, PaginationMeta, PaginationParams, UpdateEventRequest,
};
use crate::app_state::AppState;
use crate::domain::EventId;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /events` — Create a new event.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] when the title is empty.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Create a new event",
    description = "Creates an event with the given details. Capacity bounds the number of confirmed registrations; further registrants are waitlisted.",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created successfully", body = CreateEventResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let title = req.title.clone();
    let category = req.category.clone();
    let capacity = req.capacity;

    let event_id = state.event_service.create_event(req.into()).await?;

    let response = CreateEventResponse {
        event_id,
        title,
        category,
        capacity,
        created_at: Utc::now(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /events` — List events with pagination and optional category filter.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List events",
    description = "Returns a paginated list of events, optionally filtered by category.",
    params(PaginationParams, EventFilterParams),
    responses(
        (status = 200, description = "Paginated event list", body = EventListResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<EventFilterParams>,
) -> impl IntoResponse {
    let params = params.clamped();
    let summaries = state
        .event_service
        .list_events(filter.category.as_deref())
        .await;

    let total = u32::try_from(summaries.len()).unwrap_or(u32::MAX);
    // Widen before multiplying: u32 math would overflow on large pages.
    let start = u64::from(params.page - 1) * u64::from(params.per_page);
    let data: Vec<EventSummaryDto> = summaries
        .into_iter()
        .skip(usize::try_from(start).unwrap_or(usize::MAX))
        .take(params.per_page as usize)
        .map(EventSummaryDto::from)
        .collect();

    Json(EventListResponse {
        data,
        pagination: PaginationMeta::for_total(&params, total),
    })
}

/// `GET /events/:id` — Get event details with registration counts.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Get event details",
    description = "Returns full details for a single event including confirmed count, waitlist length, and remaining spots.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Event details", body = EventDetailResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let event_id = EventId::from_uuid(id);
    let entry_lock = state.event_service.get_event(event_id).await?;
    let entry = entry_lock.read().await;
    Ok(Json(EventDetailResponse::from(&*entry)))
}

/// `PUT /events/:id` — Update an event's descriptive fields.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Update an event",
    description = "Applies a partial update. Absent fields are left untouched. Shrinking capacity never demotes existing confirmed registrations.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Updated event details", body = EventDetailResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let event_id = EventId::from_uuid(id);
    let updated = state.event_service.update_event(event_id, req.into()).await?;
    Ok(Json(EventDetailResponse::from(&updated)))
}

/// `DELETE /events/:id` — Remove an event and all of its registrations.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Delete an event",
    description = "Removes an event, discarding its registrations, and emits an EventRemoved event.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let event_id = EventId::from_uuid(id);
    state.event_service.remove_event(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Event management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}
