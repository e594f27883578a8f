//! Service layer: orchestrates registry mutations and event emission.

pub mod event_service;
pub mod registration_service;

pub use event_service::EventService;
pub use registration_service::{CancellationOutcome, NewRegistration, RegistrationService};
