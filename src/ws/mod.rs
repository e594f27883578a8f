//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams registry events to clients
//! with per-event subscription filtering, serving live dashboards.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
