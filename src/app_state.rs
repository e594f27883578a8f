//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::{EventService, RegistrationService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Event CRUD service.
    pub event_service: Arc<EventService>,
    /// Registration and admission service.
    pub registration_service: Arc<RegistrationService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}
