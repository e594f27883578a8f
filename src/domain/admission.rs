//! Capacity/waitlist admission policy.
//!
//! Pure decision logic for event registration: whether a new registration
//! is admitted as confirmed or deferred to the waitlist, where a user sits
//! in the FIFO waitlist, and whether a status transition is a promotion
//! that should trigger a notification.
//!
//! Everything here is a total function over its inputs — no I/O, no state,
//! no errors. The caller is responsible for invoking these functions while
//! holding the event's write lock so that "count confirmed, decide, insert"
//! is a single atomic unit; a naive read-then-write sequence under
//! concurrent registration requests can overbook an event.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Status of a registration.
///
/// A registration is created in one of the two statuses and may only ever
/// transition `Waitlist -> Confirmed` (a promotion). There is no transition
/// back from `Confirmed` to `Waitlist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// Counted against the event's capacity.
    Confirmed,
    /// Deferred because capacity was met at admission time; eligible for
    /// promotion later.
    Waitlist,
}

impl RegistrationStatus {
    /// Returns the wire string for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Waitlist => "waitlist",
        }
    }

    /// Lenient parse: `None` for unrecognized strings instead of an error.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(Self::Confirmed),
            "waitlist" => Some(Self::Waitlist),
            _ => None,
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s).ok_or_else(|| GatewayError::InvalidStatus(s.to_string()))
    }
}

/// Decides the status of a new registration request.
///
/// Returns [`RegistrationStatus::Confirmed`] exactly when
/// `confirmed_count < capacity`; a capacity of zero therefore always
/// yields [`RegistrationStatus::Waitlist`]. Deterministic and side-effect
/// free.
#[must_use]
pub const fn decide_status(capacity: u32, confirmed_count: u32) -> RegistrationStatus {
    if confirmed_count < capacity {
        RegistrationStatus::Confirmed
    } else {
        RegistrationStatus::Waitlist
    }
}

/// Returns the 1-based position of `user_id` in a waitlist.
///
/// `ordered_user_ids` must be the event's waitlisted user ids in ascending
/// `registered_at` order (first registered, first served); ties keep their
/// original order. Returns `None` when the user is absent, including for
/// the empty waitlist.
pub fn waitlist_position<'a, I>(ordered_user_ids: I, user_id: &str) -> Option<NonZeroUsize>
where
    I: IntoIterator<Item = &'a str>,
{
    ordered_user_ids
        .into_iter()
        .position(|id| id == user_id)
        .and_then(|idx| NonZeroUsize::new(idx.saturating_add(1)))
}

/// Returns `true` exactly for the `Waitlist -> Confirmed` transition.
#[must_use]
pub const fn is_promotion(previous: RegistrationStatus, next: RegistrationStatus) -> bool {
    matches!(
        (previous, next),
        (RegistrationStatus::Waitlist, RegistrationStatus::Confirmed)
    )
}

/// String-level notification check for raw status values.
///
/// `true` exactly when `previous == "waitlist"` and `next == "confirmed"`.
/// Unrecognized status strings yield `false` rather than an error — the
/// fail-safe behavior for boundary code that handles raw strings. Typed
/// call sites should use [`is_promotion`] with parsed statuses instead.
#[must_use]
pub fn should_notify(previous: &str, next: &str) -> bool {
    match (
        RegistrationStatus::parse_lenient(previous),
        RegistrationStatus::parse_lenient(next),
    ) {
        (Some(prev), Some(nxt)) => is_promotion(prev, nxt),
        _ => false,
    }
}
