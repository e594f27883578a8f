//! Persistence layer: PostgreSQL event log and event snapshots.
//!
//! Stores the registry event stream durably and periodically snapshots
//! every event aggregate so the in-memory registry can be restored on
//! startup. The concrete implementation uses `sqlx::PgPool` for async
//! PostgreSQL access.

pub mod models;
pub mod postgres;
