//! Notification dispatch: template types, payloads, and the dispatcher seam.
//!
//! The dispatcher is an injected dependency so services can be tested
//! against an in-memory implementation. Dispatch is fire-and-forget from
//! the caller's point of view: the registration service logs and swallows
//! dispatch failures, never propagating them to the registrant.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::admission::RegistrationStatus;
use crate::domain::event_entry::EventEntry;
use crate::domain::registration::Registration;
use crate::domain::{EventId, RegistrationId};
use crate::error::GatewayError;

/// Notification template selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Sent when a registration is confirmed, including promotions.
    RegistrationConfirmation,
    /// Sent when a registration lands on the waitlist.
    WaitlistConfirmation,
}

impl NotificationKind {
    /// Returns the wire string for this template.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RegistrationConfirmation => "registration_confirmation",
            Self::WaitlistConfirmation => "waitlist_confirmation",
        }
    }

    /// Template used when announcing the given admission outcome.
    #[must_use]
    pub const fn for_status(status: RegistrationStatus) -> Self {
        match status {
            RegistrationStatus::Confirmed => Self::RegistrationConfirmation,
            RegistrationStatus::Waitlist => Self::WaitlistConfirmation,
        }
    }
}

/// Payload handed to the notification dispatcher.
///
/// Carries the user/event display fields the email templates interpolate.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// Template selector.
    pub kind: NotificationKind,
    /// Recipient email address.
    pub to: String,
    /// Recipient display name.
    pub user_name: String,
    /// Event title.
    pub event_title: String,
    /// Event date string.
    pub event_date: String,
    /// Event time range (e.g. `"18:00 - 20:00"`).
    pub event_time: String,
    /// Event location.
    pub event_location: String,
    /// Status being announced.
    pub status: RegistrationStatus,
    /// Registration the notification refers to.
    pub registration_id: RegistrationId,
    /// Event the notification refers to.
    pub event_id: EventId,
}

impl Notification {
    /// Builds the notification announcing a registration's current status.
    #[must_use]
    pub fn for_registration(entry: &EventEntry, registration: &Registration) -> Self {
        Self {
            kind: NotificationKind::for_status(registration.status),
            to: registration.user_email.clone(),
            user_name: registration.user_name.clone(),
            event_title: entry.details.title.clone(),
            event_date: entry.details.date.clone(),
            event_time: format!("{} - {}", entry.details.start_time, entry.details.end_time),
            event_location: entry.details.location.clone(),
            status: registration.status,
            registration_id: registration.registration_id,
            event_id: entry.event_id,
        }
    }
}

/// Dispatch seam for outbound notifications.
///
/// The production implementation forwards to an external email function;
/// tests inject in-memory fakes.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync + fmt::Debug {
    /// Dispatches a single notification.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the downstream channel rejects the
    /// notification. Callers treat this as non-fatal.
    async fn dispatch(&self, notification: &Notification) -> Result<(), GatewayError>;
}

/// Default dispatcher: logs the notification via `tracing` and succeeds.
///
/// The actual email delivery runs in an external serverless function in
/// production deployments; this implementation is the local stand-in.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl NotificationDispatcher for LogNotifier {
    async fn dispatch(&self, notification: &Notification) -> Result<(), GatewayError> {
        tracing::info!(
            kind = notification.kind.as_str(),
            to = %notification.to,
            event_id = %notification.event_id,
            registration_id = %notification.registration_id,
            "notification dispatched"
        );
        Ok(())
    }
}


#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event_entry::tests::make_entry;

    #[test]
    fn kind_for_status() {
        assert_eq!(
            NotificationKind::for_status(RegistrationStatus::Confirmed),
            NotificationKind::RegistrationConfirmation
        );
        assert_eq!(
            NotificationKind::for_status(RegistrationStatus::Waitlist),
            NotificationKind::WaitlistConfirmation
        );
    }

    #[test]
    fn payload_carries_display_fields() {
        let mut entry = make_entry(5);
        let result = entry.admit(
            "user-1".to_string(),
            "user-1@example.com".to_string(),
            "Sam".to_string(),
        );
        let Ok(registration) = result else {
            panic!("admission failed");
        };

        let notification = Notification::for_registration(&entry, &registration);
        assert_eq!(notification.kind, NotificationKind::RegistrationConfirmation);
        assert_eq!(notification.to, "user-1@example.com");
        assert_eq!(notification.event_time, "18:00 - 20:00");
        assert_eq!(notification.event_title, "Rust Meetup");
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json =
            serde_json::to_string(&NotificationKind::WaitlistConfirmation).unwrap_or_default();
        assert_eq!(json, "\"waitlist_confirmation\"");
    }
}
