//! Event service: CRUD over event entries, emitting registry events.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::event_entry::{EventDetails, EventEntry, EventSummary, EventUpdate};
use crate::domain::{EventBus, EventId, EventRegistry, RegistryEvent};
use crate::error::GatewayError;

/// Orchestration layer for event CRUD.
///
/// Stateless coordinator: owns references to [`EventRegistry`] for state
/// and [`EventBus`] for event emission. Every mutation method follows the
/// pattern: acquire lock → mutate entry → emit events → return result.
#[derive(Debug, Clone)]
pub struct EventService {
    registry: Arc<EventRegistry>,
    event_bus: EventBus,
}

impl EventService {
    /// Creates a new `EventService`.
    #[must_use]
    pub fn new(registry: Arc<EventRegistry>, event_bus: EventBus) -> Self {
        Self {
            registry,
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<EventRegistry> {
        &self.registry
    }

    /// Creates a new event from the given details.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::InvalidRequest`] when the title is empty.
    pub async fn create_event(&self, details: EventDetails) -> Result<EventId, GatewayError> {
        if details.title.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "event title must not be empty".to_string(),
            ));
        }

        let event_id = EventId::new();
        let title = details.title.clone();
        let category = details.category.clone();
        let capacity = details.capacity;

        let entry = EventEntry::new(event_id, details);
        self.registry.insert(entry).await?;

        let _ = self.event_bus.publish(RegistryEvent::EventCreated {
            event_id,
            title,
            category,
            capacity,
            timestamp: Utc::now(),
        });

        tracing::info!(%event_id, capacity, "event created");
        Ok(event_id)
    }

    /// Returns the entry lock for an event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if the event does not exist.
    pub async fn get_event(
        &self,
        event_id: EventId,
    ) -> Result<Arc<RwLock<EventEntry>>, GatewayError> {
        self.registry.get(event_id).await
    }

    /// Applies a partial update to an event's descriptive fields.
    ///
    /// Shrinking capacity below the confirmed count does not demote
    /// existing registrations; the invariant is enforced at admission
    /// and promotion decisions only.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if the event does not exist.
    pub async fn update_event(
        &self,
        event_id: EventId,
        update: EventUpdate,
    ) -> Result<EventEntry, GatewayError> {
        let entry_lock = self.registry.get(event_id).await?;
        let mut entry = entry_lock.write().await;
        entry.apply_update(update);
        let updated = entry.clone();
        let capacity = entry.details.capacity;
        drop(entry);

        let _ = self.event_bus.publish(RegistryEvent::EventUpdated {
            event_id,
            capacity,
            timestamp: Utc::now(),
        });

        tracing::info!(%event_id, capacity, "event updated");
        Ok(updated)
    }

    /// Removes an event and all of its registrations.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if the event does not exist.
    pub async fn remove_event(&self, event_id: EventId) -> Result<(), GatewayError> {
        let _entry = self.registry.remove(event_id).await?;

        let _ = self.event_bus.publish(RegistryEvent::EventRemoved {
            event_id,
            timestamp: Utc::now(),
        });

        tracing::info!(%event_id, "event removed");
        Ok(())
    }

    /// Returns summaries of all events, optionally filtered by category.
    pub async fn list_events(&self, category_filter: Option<&str>) -> Vec<EventSummary> {
        self.registry.list(category_filter).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_details(capacity: u32) -> EventDetails {
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
        }
    }

    fn make_service() -> EventService {
        let registry = Arc::new(EventRegistry::new());
        let event_bus = EventBus::new(1000);
        EventService::new(registry, event_bus)
    }

    #[tokio::test]
    async fn create_event_emits_event() {
        let service = make_service();
        let mut rx = service.event_bus.subscribe();

        let result = service.create_event(make_details(50)).await;
        assert!(result.is_ok());

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "event_created");
    }

    #[tokio::test]
    async fn empty_title_is_rejected() {
        let service = make_service();
        let mut details = make_details(50);
        details.title = "  ".to_string();
        let result = service.create_event(details).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn update_event_changes_fields() {
        let service = make_service();
        let Ok(event_id) = service.create_event(make_details(50)).await else {
            panic!("event creation failed");
        };

        let result = service
            .update_event(
                event_id,
                EventUpdate {
                    capacity: Some(75),
                    location: Some("Bigger Hall".to_string()),
                    ..EventUpdate::default()
                },
            )
            .await;
        let Ok(updated) = result else {
            panic!("update failed");
        };
        assert_eq!(updated.details.capacity, 75);
        assert_eq!(updated.details.location, "Bigger Hall");
    }

    #[tokio::test]
    async fn remove_event_emits_event() {
        let service = make_service();
        let mut rx = service.event_bus.subscribe();

        let Ok(event_id) = service.create_event(make_details(50)).await else {
            panic!("event creation failed");
        };
        // Drain the EventCreated event
        let _ = rx.recv().await;

        let result = service.remove_event(event_id).await;
        assert!(result.is_ok());

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "event_removed");
    }

    #[tokio::test]
    async fn list_filters_by_category() {
        let service = make_service();
        let _ = service.create_event(make_details(10)).await;
        let mut music = make_details(10);
        music.category = "music".to_string();
        let _ = service.create_event(music).await;

        assert_eq!(service.list_events(None).await.len(), 2);
        assert_eq!(service.list_events(Some("music")).await.len(), 1);
    }
}
