//! Registration record tied to a single event and user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::admission::RegistrationStatus;
use super::ids::{EventId, RegistrationId};

/// A user's registration for one event.
///
/// Created by the admission decision in one of the two statuses; the only
/// later transition is the `waitlist -> confirmed` promotion.
/// `registered_at` is the FIFO ordering key within the waitlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    /// Unique registration identifier (immutable after creation).
    pub registration_id: RegistrationId,

    /// Event this registration belongs to.
    pub event_id: EventId,

    /// Identifier of the requesting user (from the identity collaborator).
    pub user_id: String,

    /// Email address notifications are sent to.
    pub user_email: String,

    /// Display name of the user.
    pub user_name: String,

    /// Current admission status.
    pub status: RegistrationStatus,

    /// Admission timestamp; orders the waitlist.
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    /// Creates a new registration with the given status and timestamp.
    #[must_use]
    pub fn new(
        event_id: EventId,
        user_id: String,
        user_email: String,
        user_name: String,
        status: RegistrationStatus,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            registration_id: RegistrationId::new(),
            event_id,
            user_id,
            user_email,
            user_name,
            status,
            registered_at,
        }
    }

    /// Returns `true` if this registration counts against capacity.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self.status, RegistrationStatus::Confirmed)
    }

    /// Returns `true` if this registration is waiting for a spot.
    #[must_use]
    pub const fn is_waitlisted(&self) -> bool {
        matches!(self.status, RegistrationStatus::Waitlist)
    }
}
