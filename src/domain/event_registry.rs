//! Concurrent event storage with per-event fine-grained locking.
//!
//! [`EventRegistry`] stores all active events in a `HashMap` where each
//! entry is individually protected by a [`tokio::sync::RwLock`]. This
//! allows concurrent reads on the same event and concurrent writes on
//! different events, while serializing admission decisions per event.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::EventId;
use super::event_entry::{EventEntry, EventSummary};
use crate::error::GatewayError;

/// Central store for all active events.
///
/// Uses a `RwLock<HashMap<...>>` for the outer map and per-entry
/// `Arc<RwLock<EventEntry>>` for fine-grained per-event locking.
///
/// # Concurrency
///
/// - Multiple threads may read the same event concurrently.
/// - Writes to different events are concurrent.
/// - Writes to the same event are serialized, which is what makes the
///   count-decide-insert admission sequence atomic.
#[derive(Debug)]
pub struct EventRegistry {
    events: RwLock<HashMap<EventId, Arc<RwLock<EventEntry>>>>,
}

impl EventRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a new event entry into the registry.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if an event with the same
    /// ID already exists (should never happen with UUID v4).
    pub async fn insert(&self, entry: EventEntry) -> Result<EventId, GatewayError> {
        let event_id = entry.event_id;
        let mut map = self.events.write().await;
        if map.contains_key(&event_id) {
            return Err(GatewayError::InvalidRequest(format!(
                "event {event_id} already exists"
            )));
        }
        map.insert(event_id, Arc::new(RwLock::new(entry)));
        Ok(event_id)
    }

    /// Returns a shared reference to the event entry behind a per-event lock.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if no event with the given ID
    /// exists.
    pub async fn get(&self, event_id: EventId) -> Result<Arc<RwLock<EventEntry>>, GatewayError> {
        let map = self.events.read().await;
        map.get(&event_id)
            .cloned()
            .ok_or(GatewayError::EventNotFound(*event_id.as_uuid()))
    }

    /// Removes an event from the registry, returning a copy of its entry.
    ///
    /// A handler may still hold the entry's `Arc` (e.g. a read in flight
    /// during the delete), so the entry is cloned out rather than unwrapped.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if no event with the given ID
    /// exists.
    pub async fn remove(&self, event_id: EventId) -> Result<EventEntry, GatewayError> {
        let arc = {
            let mut map = self.events.write().await;
            map.remove(&event_id)
                .ok_or(GatewayError::EventNotFound(*event_id.as_uuid()))?
        };
        let entry = arc.read().await.clone();
        Ok(entry)
    }

    /// Returns summaries of all events, optionally filtered by category.
    pub async fn list(&self, category_filter: Option<&str>) -> Vec<EventSummary> {
        let map = self.events.read().await;
        let mut summaries = Vec::with_capacity(map.len());
        for entry_lock in map.values() {
            let entry = entry_lock.read().await;
            if let Some(filter) = category_filter
                && entry.details.category != filter
            {
                continue;
            }
            summaries.push(EventSummary::from(&*entry));
        }
        summaries
    }

    /// Returns the entry locks of all events, for cross-event scans.
    pub async fn entries(&self) -> Vec<Arc<RwLock<EventEntry>>> {
        self.events.read().await.values().cloned().collect()
    }

    /// Clones the full state of every event, for persistence snapshots.
    pub async fn snapshot(&self) -> Vec<EventEntry> {
        let locks = self.entries().await;
        let mut entries = Vec::with_capacity(locks.len());
        for lock in locks {
            entries.push(lock.read().await.clone());
        }
        entries
    }

    /// Returns the number of events in the registry.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// Returns `true` if the registry contains no events.
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event_entry::tests::make_entry;

    #[tokio::test]
    async fn insert_and_get() {
        let registry = EventRegistry::new();
        let entry = make_entry(10);
        let id = entry.event_id;

        let result = registry.insert(entry).await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap_or_default(), id);

        let fetched = registry.get(id).await;
        assert!(fetched.is_ok());
    }

    #[tokio::test]
    async fn get_nonexistent_returns_error() {
        let registry = EventRegistry::new();
        let result = registry.get(EventId::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn remove_returns_entry() {
        let registry = EventRegistry::new();
        let entry = make_entry(10);
        let id = entry.event_id;

        let _ = registry.insert(entry).await;
        let removed = registry.remove(id).await;
        assert!(removed.is_ok());

        // Now it should be gone
        let result = registry.get(id).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn remove_succeeds_while_entry_is_shared() {
        let registry = EventRegistry::new();
        let entry = make_entry(10);
        let id = entry.event_id;
        let _ = registry.insert(entry).await;

        // Simulate a concurrent reader still holding the entry lock.
        let held = registry.get(id).await;
        let Ok(held) = held else {
            panic!("get failed");
        };
        let _guard = held.read().await;

        let removed = registry.remove(id).await;
        assert!(removed.is_ok());
        assert!(registry.get(id).await.is_err());
    }

    #[tokio::test]
    async fn remove_nonexistent_returns_error() {
        let registry = EventRegistry::new();
        let result = registry.remove(EventId::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn list_returns_all() {
        let registry = EventRegistry::new();
        let _ = registry.insert(make_entry(5)).await;
        let _ = registry.insert(make_entry(5)).await;

        let list = registry.list(None).await;
        assert_eq!(list.len(), 2);
    }

    #[tokio::test]
    async fn list_filters_by_category() {
        let registry = EventRegistry::new();
        let _ = registry.insert(make_entry(5)).await;

        let matched = registry.list(Some("tech")).await;
        assert_eq!(matched.len(), 1);

        let unmatched = registry.list(Some("music")).await;
        assert!(unmatched.is_empty());
    }

    #[tokio::test]
    async fn snapshot_clones_entries() {
        let registry = EventRegistry::new();
        let _ = registry.insert(make_entry(5)).await;
        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test]
    async fn len_and_is_empty() {
        let registry = EventRegistry::new();
        assert!(registry.is_empty().await);
        assert_eq!(registry.len().await, 0);

        let _ = registry.insert(make_entry(5)).await;
        assert!(!registry.is_empty().await);
        assert_eq!(registry.len().await, 1);
    }
}
