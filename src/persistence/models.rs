//! Database models for event snapshots.
//!
//! The `registry_events` audit log is append-only from the gateway's
//! point of view and needs no read model here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A snapshot row from the `event_snapshots` table.
///
/// `state_json` holds the full serialized aggregate, details and
/// registrations included, so a restore needs no event replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSnapshot {
    /// Auto-increment row ID.
    pub id: i64,
    /// Event that was snapshotted.
    pub event_id: Uuid,
    /// Full aggregate state as JSONB.
    pub state_json: serde_json::Value,
    /// Snapshot timestamp.
    pub snapshot_at: DateTime<Utc>,
}
