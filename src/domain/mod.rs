//! Domain layer: admission policy, event registry, and event system.
//!
//! This module contains the server-side domain model including event and
//! registration identity, the event aggregate with its registrations, the
//! pure admission policy evaluator, the event bus for broadcasting state
//! changes, and the registry for concurrent event storage.

pub mod admission;
pub mod event_bus;
pub mod event_entry;
pub mod event_registry;
pub mod ids;
pub mod registration;
pub mod registry_event;

pub use admission::RegistrationStatus;
pub use event_bus::EventBus;
pub use event_entry::EventEntry;
pub use event_registry::EventRegistry;
pub use ids::{EventId, RegistrationId};
pub use registration::Registration;
pub use registry_event::RegistryEvent;
