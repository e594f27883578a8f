//! # gather-gateway
//!
//! REST API and WebSocket gateway for the Gather event discovery and
//! registration service.
//!
//! This crate provides an HTTP and WebSocket interface for browsing events,
//! registering for them, and managing registrations. The capacity/waitlist
//! admission policy lives in [`domain::admission`] — everything else is a
//! coordination layer around it.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── EventService / RegistrationService (service/)
//!     ├── EventBus (domain/)
//!     ├── NotificationDispatcher (notify/)
//!     │
//!     ├── EventRegistry (domain/)
//!     ├── Admission policy (domain/admission)
//!     │
//!     └── PostgreSQL Persistence
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod notify;
pub mod persistence;
pub mod service;
pub mod ws;
