//! Registration DTOs: admission, status updates, cancellation, waitlist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::admission::RegistrationStatus;
use crate::domain::registration::Registration;
use crate::domain::{EventId, RegistrationId};
use crate::service::registration_service::NewRegistration;

/// Request body for `POST /events/{id}/registrations`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRegistrationRequest {
    /// Identifier of the requesting user.
    pub user_id: String,
    /// Email address for notifications.
    pub user_email: String,
    /// Display name of the user.
    pub user_name: String,
}

impl From<CreateRegistrationRequest> for NewRegistration {
    fn from(req: CreateRegistrationRequest) -> Self {
        Self {
            user_id: req.user_id,
            user_email: req.user_email,
            user_name: req.user_name,
        }
    }
}

/// A single registration as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegistrationDto {
    /// Registration identifier.
    pub registration_id: RegistrationId,
    /// Event the registration belongs to.
    pub event_id: EventId,
    /// Registrant identifier.
    pub user_id: String,
    /// Registrant email.
    pub user_email: String,
    /// Registrant display name.
    pub user_name: String,
    /// Current status (`confirmed` or `waitlist`).
    pub status: RegistrationStatus,
    /// Admission timestamp.
    pub registered_at: DateTime<Utc>,
}

impl From<Registration> for RegistrationDto {
    fn from(r: Registration) -> Self {
        Self {
            registration_id: r.registration_id,
            event_id: r.event_id,
            user_id: r.user_id,
            user_email: r.user_email,
            user_name: r.user_name,
            status: r.status,
            registered_at: r.registered_at,
        }
    }
}

/// List response for registration collections.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationListResponse {
    /// Registrations in admission order.
    pub data: Vec<RegistrationDto>,
    /// Total number of registrations returned.
    pub total: u32,
}

impl RegistrationListResponse {
    /// Wraps a list of registrations in the response envelope.
    #[must_use]
    pub fn from_registrations(registrations: Vec<Registration>) -> Self {
        let data: Vec<RegistrationDto> =
            registrations.into_iter().map(RegistrationDto::from).collect();
        let total = u32::try_from(data.len()).unwrap_or(u32::MAX);
        Self { data, total }
    }
}

/// Request body for `PUT /events/{id}/registrations/{rid}`.
///
/// The status string is validated strictly; anything other than
/// `"confirmed"` or `"waitlist"` is rejected with a 400.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRegistrationRequest {
    /// Target status string.
    pub status: String,
}

/// Response body for `DELETE /events/{id}/registrations/{rid}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CancelRegistrationResponse {
    /// The registration that was removed.
    pub cancelled: RegistrationDto,
    /// The waitlisted registration promoted into the freed spot, if any.
    pub promoted: Option<RegistrationDto>,
}

/// Query parameters for `GET /events/{id}/waitlist-position`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct WaitlistPositionParams {
    /// User to look up.
    pub user_id: String,
}

/// Response body for `GET /events/{id}/waitlist-position`.
#[derive(Debug, Serialize, ToSchema)]
pub struct WaitlistPositionResponse {
    /// Event identifier.
    pub event_id: EventId,
    /// User the position refers to.
    pub user_id: String,
    /// Whether the user is currently waitlisted.
    pub waitlisted: bool,
    /// 1-based FIFO waitlist position; absent when not waitlisted.
    pub position: Option<u32>,
}

/// Query parameters for `GET /registrations`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct UserRegistrationsParams {
    /// User whose registrations to return.
    pub user_id: String,
}
