//! Registration service: admission, promotion, cancellation, waitlist queries.
//!
//! Every mutation acquires the target event's write lock first, so the
//! admission sequence "count confirmed, decide, insert" and the
//! cancellation sequence "remove, promote next" each execute as one
//! atomic unit. Notification dispatch happens after the lock is released
//! and is fire-and-forget: failures are logged and swallowed.

use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::Utc;

use crate::domain::admission::RegistrationStatus;
use crate::domain::registration::Registration;
use crate::domain::{EventBus, EventId, EventRegistry, RegistrationId, RegistryEvent};
use crate::error::GatewayError;
use crate::notify::{Notification, NotificationDispatcher};

/// Input fields for a new registration request.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    /// Identifier of the requesting user.
    pub user_id: String,
    /// Email address for notifications.
    pub user_email: String,
    /// Display name of the user.
    pub user_name: String,
}

/// Result of cancelling a registration.
#[derive(Debug, Clone)]
pub struct CancellationOutcome {
    /// The registration that was removed.
    pub cancelled: Registration,
    /// The waitlisted registration promoted into the freed spot, if any.
    pub promoted: Option<Registration>,
}

/// Orchestration layer for all registration operations.
#[derive(Debug, Clone)]
pub struct RegistrationService {
    registry: Arc<EventRegistry>,
    event_bus: EventBus,
    notifier: Arc<dyn NotificationDispatcher>,
    auto_promote: bool,
}

impl RegistrationService {
    /// Creates a new `RegistrationService`.
    #[must_use]
    pub fn new(
        registry: Arc<EventRegistry>,
        event_bus: EventBus,
        notifier: Arc<dyn NotificationDispatcher>,
        auto_promote: bool,
    ) -> Self {
        Self {
            registry,
            event_bus,
            notifier,
            auto_promote,
        }
    }

    /// Registers a user for an event, deciding confirmed vs. waitlist.
    ///
    /// The admission decision and the insertion happen under the event's
    /// write lock. A confirmation or waitlist notification is dispatched
    /// after the lock is released.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] for an unknown event and
    /// [`GatewayError::DuplicateRegistration`] when the user already holds
    /// a registration for it.
    pub async fn register(
        &self,
        event_id: EventId,
        request: NewRegistration,
    ) -> Result<Registration, GatewayError> {
        let entry_lock = self.registry.get(event_id).await?;
        let mut entry = entry_lock.write().await;
        let registration =
            entry.admit(request.user_id, request.user_email, request.user_name)?;
        let notification = Notification::for_registration(&entry, &registration);
        drop(entry);

        let _ = self.event_bus.publish(RegistryEvent::RegistrationCreated {
            event_id,
            registration_id: registration.registration_id,
            user_id: registration.user_id.clone(),
            status: registration.status,
            timestamp: Utc::now(),
        });

        tracing::info!(
            %event_id,
            registration_id = %registration.registration_id,
            status = registration.status.as_str(),
            "registration created"
        );

        self.dispatch_quietly(notification).await;
        Ok(registration)
    }

    /// Applies an explicit status update to a registration.
    ///
    /// Promotions are capacity-checked under the event's write lock and
    /// trigger a confirmation notification; all other transitions are
    /// silent.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`],
    /// [`GatewayError::RegistrationNotFound`],
    /// [`GatewayError::InvalidRequest`] for a demotion attempt, or
    /// [`GatewayError::CapacityExceeded`] when the event is full.
    pub async fn update_status(
        &self,
        event_id: EventId,
        registration_id: RegistrationId,
        next: RegistrationStatus,
    ) -> Result<Registration, GatewayError> {
        let entry_lock = self.registry.get(event_id).await?;
        let mut entry = entry_lock.write().await;
        let (updated, promoted) = entry.set_status(registration_id, next)?;
        let notification = promoted.then(|| Notification::for_registration(&entry, &updated));
        drop(entry);

        if promoted {
            let _ = self.event_bus.publish(RegistryEvent::RegistrationPromoted {
                event_id,
                registration_id,
                user_id: updated.user_id.clone(),
                timestamp: Utc::now(),
            });
            tracing::info!(%event_id, %registration_id, "registration promoted");
        }

        if let Some(notification) = notification {
            self.dispatch_quietly(notification).await;
        }
        Ok(updated)
    }

    /// Cancels a registration.
    ///
    /// When a confirmed registration is cancelled and auto-promotion is
    /// enabled, the earliest waitlisted registration is promoted in the
    /// same critical section and notified.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] or
    /// [`GatewayError::RegistrationNotFound`].
    pub async fn cancel(
        &self,
        event_id: EventId,
        registration_id: RegistrationId,
    ) -> Result<CancellationOutcome, GatewayError> {
        let entry_lock = self.registry.get(event_id).await?;
        let mut entry = entry_lock.write().await;
        let cancelled = entry.remove_registration(registration_id)?;

        let promoted = if self.auto_promote && cancelled.is_confirmed() {
            entry.promote_next()
        } else {
            None
        };
        let notification = promoted
            .as_ref()
            .map(|p| Notification::for_registration(&entry, p));
        drop(entry);

        let _ = self
            .event_bus
            .publish(RegistryEvent::RegistrationCancelled {
                event_id,
                registration_id,
                user_id: cancelled.user_id.clone(),
                previous_status: cancelled.status,
                timestamp: Utc::now(),
            });

        if let Some(promoted_reg) = &promoted {
            let _ = self.event_bus.publish(RegistryEvent::RegistrationPromoted {
                event_id,
                registration_id: promoted_reg.registration_id,
                user_id: promoted_reg.user_id.clone(),
                timestamp: Utc::now(),
            });
            tracing::info!(
                %event_id,
                registration_id = %promoted_reg.registration_id,
                "waitlisted registration promoted after cancellation"
            );
        }

        tracing::info!(%event_id, %registration_id, "registration cancelled");

        if let Some(notification) = notification {
            self.dispatch_quietly(notification).await;
        }

        Ok(CancellationOutcome {
            cancelled,
            promoted,
        })
    }

    /// Returns a user's 1-based FIFO waitlist position for an event.
    ///
    /// `None` when the user is not on the waitlist.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] for an unknown event.
    pub async fn waitlist_position(
        &self,
        event_id: EventId,
        user_id: &str,
    ) -> Result<Option<NonZeroUsize>, GatewayError> {
        let entry_lock = self.registry.get(event_id).await?;
        let entry = entry_lock.read().await;
        Ok(entry.waitlist_position_for(user_id))
    }

    /// Returns all registrations for an event in admission order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] for an unknown event.
    pub async fn registrations_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Registration>, GatewayError> {
        let entry_lock = self.registry.get(event_id).await?;
        let entry = entry_lock.read().await;
        Ok(entry.registrations.clone())
    }

    /// Returns all of a user's registrations across events, newest first.
    pub async fn registrations_for_user(&self, user_id: &str) -> Vec<Registration> {
        let mut result = Vec::new();
        for entry_lock in self.registry.entries().await {
            let entry = entry_lock.read().await;
            result.extend(
                entry
                    .registrations
                    .iter()
                    .filter(|r| r.user_id == user_id)
                    .cloned(),
            );
        }
        result.sort_by(|a, b| b.registered_at.cmp(&a.registered_at));
        result
    }

    /// Returns a user's registration for one event, if any.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] for an unknown event.
    pub async fn user_registration(
        &self,
        event_id: EventId,
        user_id: &str,
    ) -> Result<Option<Registration>, GatewayError> {
        let entry_lock = self.registry.get(event_id).await?;
        let entry = entry_lock.read().await;
        Ok(entry.registration_for_user(user_id).cloned())
    }

    /// Dispatches a notification, logging and swallowing failures.
    async fn dispatch_quietly(&self, notification: Notification) {
        if let Err(err) = self.notifier.dispatch(&notification).await {
            tracing::warn!(
                kind = notification.kind.as_str(),
                to = %notification.to,
                error = %err,
                "notification dispatch failed"
            );
        }
    }
}
