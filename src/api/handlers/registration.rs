//! Registration handlers: admission, listing, status updates, cancellation,
//! and waitlist position lookups.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    CancelRegistrationResponse, CreateRegistrationRequest, RegistrationDto,
    RegistrationListResponse, UpdateRegistrationRequest, UserRegistrationsParams,
    WaitlistPositionParams, WaitlistPositionResponse,
};
use crate::app_state::AppState;
use crate::domain::admission::RegistrationStatus;
use crate::domain::{EventId, RegistrationId};
use crate::error::{ErrorResponse, GatewayError};

/// `POST /events/:id/registrations` — Register a user for an event.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] or
/// [`GatewayError::DuplicateRegistration`].
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/registrations",
    tag = "Registrations",
    summary = "Register for an event",
    description = "Admits a user to an event. The registration is confirmed while confirmed spots remain and waitlisted once the event is full. A confirmation or waitlist notification is dispatched asynchronously.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = CreateRegistrationRequest,
    responses(
        (status = 201, description = "Registration created", body = RegistrationDto),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "User already registered", body = ErrorResponse),
    )
)]
pub async fn create_registration(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<CreateRegistrationRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let event_id = EventId::from_uuid(id);
    let registration = state
        .registration_service
        .register(event_id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(RegistrationDto::from(registration))))
}

/// `GET /events/:id/registrations` — List an event's registrations.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/registrations",
    tag = "Registrations",
    summary = "List registrations for an event",
    description = "Returns all registrations for an event in admission order; waitlisted entries appear in FIFO order.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Registration list", body = RegistrationListResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn list_registrations(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let event_id = EventId::from_uuid(id);
    let registrations = state
        .registration_service
        .registrations_for_event(event_id)
        .await?;
    Ok(Json(RegistrationListResponse::from_registrations(
        registrations,
    )))
}

/// `PUT /events/:id/registrations/:rid` — Update a registration's status.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidStatus`] for an unrecognized status
/// string, [`GatewayError::CapacityExceeded`] when a promotion would
/// overbook the event, or a not-found error.
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}/registrations/{rid}",
    tag = "Registrations",
    summary = "Update registration status",
    description = "Moves a registration to the given status. Promotions from waitlist to confirmed are capacity-checked and trigger a confirmation notification. Demotions are rejected.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
        ("rid" = uuid::Uuid, Path, description = "Registration UUID"),
    ),
    request_body = UpdateRegistrationRequest,
    responses(
        (status = 200, description = "Updated registration", body = RegistrationDto),
        (status = 400, description = "Unknown status or invalid transition", body = ErrorResponse),
        (status = 404, description = "Event or registration not found", body = ErrorResponse),
        (status = 422, description = "Event is at capacity", body = ErrorResponse),
    )
)]
pub async fn update_registration(
    State(state): State<AppState>,
    Path((id, rid)): Path<(uuid::Uuid, uuid::Uuid)>,
    Json(req): Json<UpdateRegistrationRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let next = RegistrationStatus::from_str(&req.status)?;
    let updated = state
        .registration_service
        .update_status(
            EventId::from_uuid(id),
            RegistrationId::from_uuid(rid),
            next,
        )
        .await?;
    Ok(Json(RegistrationDto::from(updated)))
}

/// `DELETE /events/:id/registrations/:rid` — Cancel a registration.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] or
/// [`GatewayError::RegistrationNotFound`].
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}/registrations/{rid}",
    tag = "Registrations",
    summary = "Cancel a registration",
    description = "Removes a registration. When a confirmed registration is cancelled and auto-promotion is enabled, the earliest waitlisted registration takes the freed spot and is notified.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
        ("rid" = uuid::Uuid, Path, description = "Registration UUID"),
    ),
    responses(
        (status = 200, description = "Cancellation outcome", body = CancelRegistrationResponse),
        (status = 404, description = "Event or registration not found", body = ErrorResponse),
    )
)]
pub async fn cancel_registration(
    State(state): State<AppState>,
    Path((id, rid)): Path<(uuid::Uuid, uuid::Uuid)>,
) -> Result<impl IntoResponse, GatewayError> {
    let outcome = state
        .registration_service
        .cancel(EventId::from_uuid(id), RegistrationId::from_uuid(rid))
        .await?;
    Ok(Json(CancelRegistrationResponse {
        cancelled: RegistrationDto::from(outcome.cancelled),
        promoted: outcome.promoted.map(RegistrationDto::from),
    }))
}

/// `GET /events/:id/waitlist-position` — A user's waitlist position.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/waitlist-position",
    tag = "Registrations",
    summary = "Look up a waitlist position",
    description = "Returns the user's 1-based FIFO waitlist position, or a null position when the user is not waitlisted.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
        WaitlistPositionParams,
    ),
    responses(
        (status = 200, description = "Waitlist position", body = WaitlistPositionResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn waitlist_position(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(params): Query<WaitlistPositionParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let event_id = EventId::from_uuid(id);
    let position = state
        .registration_service
        .waitlist_position(event_id, &params.user_id)
        .await?;
    let position = position.map(|p| u32::try_from(p.get()).unwrap_or(u32::MAX));
    Ok(Json(WaitlistPositionResponse {
        event_id,
        user_id: params.user_id,
        waitlisted: position.is_some(),
        position,
    }))
}

/// `GET /registrations` — A user's registrations across all events.
#[utoipa::path(
    get,
    path = "/api/v1/registrations",
    tag = "Registrations",
    summary = "List a user's registrations",
    description = "Returns every registration held by the user across all events, newest first.",
    params(UserRegistrationsParams),
    responses(
        (status = 200, description = "Registration list", body = RegistrationListResponse),
    )
)]
pub async fn user_registrations(
    State(state): State<AppState>,
    Query(params): Query<UserRegistrationsParams>,
) -> impl IntoResponse {
    let registrations = state
        .registration_service
        .registrations_for_user(&params.user_id)
        .await;
    Json(RegistrationListResponse::from_registrations(registrations))
}

/// Registration routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/events/{id}/registrations",
            get(list_registrations).post(create_registration),
        )
        .route(
            "/events/{id}/registrations/{rid}",
            axum::routing::put(update_registration).delete(cancel_registration),
        )
        .route("/events/{id}/waitlist-position", get(waitlist_position))
        .route("/registrations", get(user_registrations))
}
