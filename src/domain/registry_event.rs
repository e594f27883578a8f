//! Domain events reflecting registry state mutations.
//!
//! Every state change emits a [`RegistryEvent`] through the
//! [`super::EventBus`]. Events are broadcast to WebSocket subscribers and
//! optionally persisted to the PostgreSQL event log.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::admission::RegistrationStatus;
use super::ids::{EventId, RegistrationId};

/// Domain event emitted after every state mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// Emitted when a new event is created.
    EventCreated {
        /// Event identifier.
        event_id: EventId,
        /// Event title.
        title: String,
        /// Category label.
        category: String,
        /// Maximum confirmed registrations.
        capacity: u32,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after an event's descriptive fields are updated.
    EventUpdated {
        /// Event identifier.
        event_id: EventId,
        /// Capacity after the update.
        capacity: u32,
        /// Update timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when an event is removed along with its registrations.
    EventRemoved {
        /// Event identifier.
        event_id: EventId,
        /// Removal timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after an admission decision.
    RegistrationCreated {
        /// Event identifier.
        event_id: EventId,
        /// Registration identifier.
        registration_id: RegistrationId,
        /// Requesting user.
        user_id: String,
        /// Admission outcome.
        status: RegistrationStatus,
        /// Admission timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted on the `waitlist -> confirmed` transition.
    RegistrationPromoted {
        /// Event identifier.
        event_id: EventId,
        /// Registration identifier.
        registration_id: RegistrationId,
        /// Promoted user.
        user_id: String,
        /// Promotion timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a registration is cancelled or deleted.
    RegistrationCancelled {
        /// Event identifier.
        event_id: EventId,
        /// Registration identifier.
        registration_id: RegistrationId,
        /// Cancelling user.
        user_id: String,
        /// Status the registration held before cancellation.
        previous_status: RegistrationStatus,
        /// Cancellation timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl RegistryEvent {
    /// Returns the event ID associated with this domain event.
    #[must_use]
    pub fn event_id(&self) -> EventId {
        match self {
            Self::EventCreated { event_id, .. }
            | Self::EventUpdated { event_id, .. }
            | Self::EventRemoved { event_id, .. }
            | Self::RegistrationCreated { event_id, .. }
            | Self::RegistrationPromoted { event_id, .. }
            | Self::RegistrationCancelled { event_id, .. } => *event_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::EventCreated { .. } => "event_created",
            Self::EventUpdated { .. } => "event_updated",
            Self::EventRemoved { .. } => "event_removed",
            Self::RegistrationCreated { .. } => "registration_created",
            Self::RegistrationPromoted { .. } => "registration_promoted",
            Self::RegistrationCancelled { .. } => "registration_cancelled",
        }
    }
}
