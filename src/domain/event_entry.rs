//! Event aggregate: descriptive fields plus its registrations.
//!
//! [`EventEntry`] is the unit of locking in the registry. All admission
//! decisions, promotions, and cancellations mutate an entry while its
//! per-event write lock is held, which makes "count confirmed, decide,
//! insert" a single atomic unit and upholds the `confirmed <= capacity`
//! invariant under concurrent requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use super::admission::{self, RegistrationStatus};
use super::ids::{EventId, RegistrationId};
use super::registration::Registration;
use crate::error::GatewayError;

/// Descriptive fields of an event as entered by its organizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDetails {
    /// Event title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Category label used for browsing filters.
    pub category: String,
    /// Event date as an ISO `YYYY-MM-DD` string.
    pub date: String,
    /// Start time as entered (e.g. `"18:00"`).
    pub start_time: String,
    /// End time as entered.
    pub end_time: String,
    /// Venue or address.
    pub location: String,
    /// Maximum number of confirmed registrations.
    pub capacity: u32,
    /// Identifier of the organizing user.
    pub organizer_id: String,
    /// Cover image URL.
    pub image_url: String,
    /// Whether the event is featured on the discovery page.
    pub is_featured: bool,
}

/// Partial update to an event's descriptive fields.
///
/// `None` fields are left untouched, mirroring the partial-update semantics
/// of the organizer dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventUpdate {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New date.
    pub date: Option<String>,
    /// New start time.
    pub start_time: Option<String>,
    /// New end time.
    pub end_time: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New capacity. Shrinking below the confirmed count does not demote
    /// anyone; the invariant is enforced at admission decisions only.
    pub capacity: Option<u32>,
    /// New cover image URL.
    pub image_url: Option<String>,
    /// New featured flag.
    pub is_featured: Option<bool>,
}

/// Aggregate combining an event with its registrations.
///
/// Registrations are append-ordered by `registered_at`, so filtering the
/// vector by status yields the FIFO waitlist without re-sorting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEntry {
    /// Unique event identifier (immutable after creation).
    pub event_id: EventId,

    /// Organizer-supplied descriptive fields.
    pub details: EventDetails,

    /// Creation timestamp (immutable after creation).
    pub created_at: DateTime<Utc>,

    /// Timestamp of last state mutation.
    pub last_modified_at: DateTime<Utc>,

    /// All registrations for this event in admission order.
    pub registrations: Vec<Registration>,
}

impl EventEntry {
    /// Creates a new entry with no registrations.
    #[must_use]
    pub fn new(event_id: EventId, details: EventDetails) -> Self {
        let now = Utc::now();
        Self {
            event_id,
            details,
            created_at: now,
            last_modified_at: now,
            registrations: Vec::new(),
        }
    }

    /// Number of confirmed registrations.
    #[must_use]
    pub fn confirmed_count(&self) -> u32 {
        let count = self.registrations.iter().filter(|r| r.is_confirmed()).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Number of waitlisted registrations.
    #[must_use]
    pub fn waitlist_count(&self) -> u32 {
        let count = self
            .registrations
            .iter()
            .filter(|r| r.is_waitlisted())
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Confirmed spots still available.
    #[must_use]
    pub fn spots_remaining(&self) -> u32 {
        self.details.capacity.saturating_sub(self.confirmed_count())
    }

    /// Admits a new registration, deciding confirmed vs. waitlist.
    ///
    /// Must be called with the entry's write lock held; the capacity count
    /// and the insertion form one critical section.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DuplicateRegistration`] if the user already
    /// holds a registration for this event.
    pub fn admit(
        &mut self,
        user_id: String,
        user_email: String,
        user_name: String,
    ) -> Result<Registration, GatewayError> {
        if self.registrations.iter().any(|r| r.user_id == user_id) {
            return Err(GatewayError::DuplicateRegistration {
                event_id: *self.event_id.as_uuid(),
                user_id,
            });
        }

        let status = admission::decide_status(self.details.capacity, self.confirmed_count());
        let registration = Registration::new(
            self.event_id,
            user_id,
            user_email,
            user_name,
            status,
            Utc::now(),
        );
        self.registrations.push(registration.clone());
        self.last_modified_at = Utc::now();
        Ok(registration)
    }

    /// Looks up a registration by ID.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RegistrationNotFound`] if absent.
    pub fn registration(
        &self,
        registration_id: RegistrationId,
    ) -> Result<&Registration, GatewayError> {
        self.registrations
            .iter()
            .find(|r| r.registration_id == registration_id)
            .ok_or(GatewayError::RegistrationNotFound(
                *registration_id.as_uuid(),
            ))
    }

    /// Looks up a user's registration for this event, if any.
    #[must_use]
    pub fn registration_for_user(&self, user_id: &str) -> Option<&Registration> {
        self.registrations.iter().find(|r| r.user_id == user_id)
    }

    /// Applies an explicit status update to a registration.
    ///
    /// Confirming a waitlisted registration is capacity-checked so explicit
    /// promotions cannot overbook the event. The `confirmed -> waitlist`
    /// transition is not part of the status state machine and is rejected.
    ///
    /// Returns the updated registration and whether the update was a
    /// promotion (which should trigger a notification).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RegistrationNotFound`] for an unknown ID,
    /// [`GatewayError::InvalidRequest`] for a `confirmed -> waitlist`
    /// transition, and [`GatewayError::CapacityExceeded`] when a promotion
    /// would exceed capacity.
    pub fn set_status(
        &mut self,
        registration_id: RegistrationId,
        next: RegistrationStatus,
    ) -> Result<(Registration, bool), GatewayError> {
        let event_uuid = *self.event_id.as_uuid();
        let confirmed = self.confirmed_count();
        let capacity = self.details.capacity;

        let registration = self
            .registrations
            .iter_mut()
            .find(|r| r.registration_id == registration_id)
            .ok_or(GatewayError::RegistrationNotFound(
                *registration_id.as_uuid(),
            ))?;

        let previous = registration.status;
        if previous == RegistrationStatus::Confirmed && next == RegistrationStatus::Waitlist {
            return Err(GatewayError::InvalidRequest(
                "a confirmed registration cannot move back to the waitlist".to_string(),
            ));
        }

        let promotion = admission::is_promotion(previous, next);
        if promotion && confirmed >= capacity {
            return Err(GatewayError::CapacityExceeded(event_uuid));
        }

        registration.status = next;
        let updated = registration.clone();
        self.last_modified_at = Utc::now();
        Ok((updated, promotion))
    }

    /// Removes a registration, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RegistrationNotFound`] if absent.
    pub fn remove_registration(
        &mut self,
        registration_id: RegistrationId,
    ) -> Result<Registration, GatewayError> {
        let idx = self
            .registrations
            .iter()
            .position(|r| r.registration_id == registration_id)
            .ok_or(GatewayError::RegistrationNotFound(
                *registration_id.as_uuid(),
            ))?;
        Ok(self.registrations.remove(idx))
    }

    /// Promotes the earliest waitlisted registration if a spot is free.
    ///
    /// Returns the promoted registration, or `None` when the waitlist is
    /// empty or the event is still at capacity.
    pub fn promote_next(&mut self) -> Option<Registration> {
        if self.confirmed_count() >= self.details.capacity {
            return None;
        }
        let next = self.registrations.iter_mut().find(|r| r.is_waitlisted())?;
        next.status = RegistrationStatus::Confirmed;
        let promoted = next.clone();
        self.last_modified_at = Utc::now();
        Some(promoted)
    }

    /// 1-based FIFO waitlist position of a user, if waitlisted.
    #[must_use]
    pub fn waitlist_position_for(&self, user_id: &str) -> Option<NonZeroUsize> {
        admission::waitlist_position(
            self.registrations
                .iter()
                .filter(|r| r.is_waitlisted())
                .map(|r| r.user_id.as_str()),
            user_id,
        )
    }

    /// Applies a partial update to the descriptive fields.
    pub fn apply_update(&mut self, update: EventUpdate) {
        if let Some(title) = update.title {
            self.details.title = title;
        }
        if let Some(description) = update.description {
            self.details.description = description;
        }
        if let Some(category) = update.category {
            self.details.category = category;
        }
        if let Some(date) = update.date {
            self.details.date = date;
        }
        if let Some(start_time) = update.start_time {
            self.details.start_time = start_time;
        }
        if let Some(end_time) = update.end_time {
            self.details.end_time = end_time;
        }
        if let Some(location) = update.location {
            self.details.location = location;
        }
        if let Some(capacity) = update.capacity {
            self.details.capacity = capacity;
        }
        if let Some(image_url) = update.image_url {
            self.details.image_url = image_url;
        }
        if let Some(is_featured) = update.is_featured {
            self.details.is_featured = is_featured;
        }
        self.last_modified_at = Utc::now();
    }
}

/// Lightweight summary of an event for list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    /// Event identifier.
    pub event_id: EventId,
    /// Event title.
    pub title: String,
    /// Category label.
    pub category: String,
    /// Event date string.
    pub date: String,
    /// Venue or address.
    pub location: String,
    /// Maximum confirmed registrations.
    pub capacity: u32,
    /// Current confirmed registrations.
    pub confirmed_count: u32,
    /// Current waitlist length.
    pub waitlist_count: u32,
    /// Whether the event is featured.
    pub is_featured: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&EventEntry> for EventSummary {
    fn from(entry: &EventEntry) -> Self {
        Self {
            event_id: entry.event_id,
            title: entry.details.title.clone(),
            category: entry.details.category.clone(),
            date: entry.details.date.clone(),
            location: entry.details.location.clone(),
            capacity: entry.details.capacity,
            confirmed_count: entry.confirmed_count(),
            waitlist_count: entry.waitlist_count(),
            is_featured: entry.details.is_featured,
            created_at: entry.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;

    /// Builds an entry with the given capacity for tests across the crate.
    pub(crate) fn make_entry(capacity: u32) -> EventEntry {
        EventEntry::new(
            EventId::new(),
            EventDetails {
                title: "Rust Meetup".to_string(),
                description: "Monthly meetup".to_string(),
                category: "tech".to_string(),
                date: "2026-09-01".to_string(),
                start_time: "18:00".to_string(),
                end_time: "20:00".to_string(),
                location: "Community Hall".to_string(),
                capacity,
                organizer_id: "org-1".to_string(),
                image_url: String::new(),
                is_featured: false,
            },
        )
    }

    fn admit(entry: &mut EventEntry, user: &str) -> Registration {
        let result = entry.admit(
            user.to_string(),
            format!("{user}@example.com"),
            user.to_string(),
        );
        let Ok(registration) = result else {
            panic!("admission failed");
        };
        registration
    }

    #[test]
    fn admits_confirmed_until_capacity_then_waitlists() {
        let mut entry = make_entry(2);
        assert_eq!(admit(&mut entry, "a").status, RegistrationStatus::Confirmed);
        assert_eq!(admit(&mut entry, "b").status, RegistrationStatus::Confirmed);
        assert_eq!(admit(&mut entry, "c").status, RegistrationStatus::Waitlist);
        assert_eq!(entry.confirmed_count(), 2);
        assert_eq!(entry.waitlist_count(), 1);
        assert_eq!(entry.spots_remaining(), 0);
    }

    #[test]
    fn zero_capacity_event_only_waitlists() {
        let mut entry = make_entry(0);
        assert_eq!(admit(&mut entry, "a").status, RegistrationStatus::Waitlist);
        assert_eq!(entry.confirmed_count(), 0);
    }

    #[test]
    fn duplicate_user_is_rejected() {
        let mut entry = make_entry(5);
        let _ = admit(&mut entry, "a");
        let result = entry.admit(
            "a".to_string(),
            "a@example.com".to_string(),
            "a".to_string(),
        );
        assert!(matches!(
            result,
            Err(GatewayError::DuplicateRegistration { .. })
        ));
    }

    #[test]
    fn waitlist_positions_follow_admission_order() {
        let mut entry = make_entry(1);
        let _ = admit(&mut entry, "a"); // confirmed
        let _ = admit(&mut entry, "b"); // waitlist 1
        let _ = admit(&mut entry, "c"); // waitlist 2

        assert_eq!(entry.waitlist_position_for("b").map(NonZeroUsize::get), Some(1));
        assert_eq!(entry.waitlist_position_for("c").map(NonZeroUsize::get), Some(2));
        assert!(entry.waitlist_position_for("a").is_none());
        assert!(entry.waitlist_position_for("nobody").is_none());
    }

    #[test]
    fn promote_next_respects_capacity_and_order() {
        let mut entry = make_entry(1);
        let confirmed = admit(&mut entry, "a");
        let _ = admit(&mut entry, "b");
        let _ = admit(&mut entry, "c");

        // Full: nothing to promote.
        assert!(entry.promote_next().is_none());

        let Ok(_) = entry.remove_registration(confirmed.registration_id) else {
            panic!("removal failed");
        };
        let promoted = entry.promote_next();
        let Some(promoted) = promoted else {
            panic!("expected a promotion");
        };
        assert_eq!(promoted.user_id, "b");
        assert_eq!(promoted.status, RegistrationStatus::Confirmed);
        assert_eq!(entry.waitlist_position_for("c").map(NonZeroUsize::get), Some(1));
    }

    #[test]
    fn explicit_promotion_is_capacity_checked() {
        let mut entry = make_entry(1);
        let _ = admit(&mut entry, "a");
        let waitlisted = admit(&mut entry, "b");

        let result = entry.set_status(waitlisted.registration_id, RegistrationStatus::Confirmed);
        assert!(matches!(result, Err(GatewayError::CapacityExceeded(_))));
    }

    #[test]
    fn explicit_promotion_reports_notification() {
        let mut entry = make_entry(2);
        let _ = admit(&mut entry, "a");
        // Shrink capacity so "b" waitlists, then restore it.
        entry.details.capacity = 1;
        let waitlisted = admit(&mut entry, "b");
        entry.details.capacity = 2;

        let result = entry.set_status(waitlisted.registration_id, RegistrationStatus::Confirmed);
        let Ok((updated, notify)) = result else {
            panic!("promotion failed");
        };
        assert!(notify);
        assert_eq!(updated.status, RegistrationStatus::Confirmed);
    }

    #[test]
    fn confirmed_cannot_return_to_waitlist() {
        let mut entry = make_entry(2);
        let confirmed = admit(&mut entry, "a");
        let result = entry.set_status(confirmed.registration_id, RegistrationStatus::Waitlist);
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[test]
    fn noop_status_update_does_not_notify() {
        let mut entry = make_entry(2);
        let confirmed = admit(&mut entry, "a");
        let result = entry.set_status(confirmed.registration_id, RegistrationStatus::Confirmed);
        let Ok((_, notify)) = result else {
            panic!("update failed");
        };
        assert!(!notify);
    }

    #[test]
    fn remove_unknown_registration_errors() {
        let mut entry = make_entry(2);
        let result = entry.remove_registration(RegistrationId::new());
        assert!(matches!(
            result,
            Err(GatewayError::RegistrationNotFound(_))
        ));
    }

    #[test]
    fn apply_update_touches_only_set_fields() {
        let mut entry = make_entry(2);
        entry.apply_update(EventUpdate {
            title: Some("Rust Meetup — September".to_string()),
            capacity: Some(10),
            ..EventUpdate::default()
        });
        assert_eq!(entry.details.title, "Rust Meetup — September");
        assert_eq!(entry.details.capacity, 10);
        assert_eq!(entry.details.category, "tech");
    }

    #[test]
    fn summary_reflects_counts() {
        let mut entry = make_entry(1);
        let _ = admit(&mut entry, "a");
        let _ = admit(&mut entry, "b");
        let summary = EventSummary::from(&entry);
        assert_eq!(summary.confirmed_count, 1);
        assert_eq!(summary.waitlist_count, 1);
        assert_eq!(summary.capacity, 1);
    }
}
