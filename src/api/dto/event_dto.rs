//! Event DTOs for create, update, get, and list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::PaginationMeta;
use crate::domain::EventId;
use crate::domain::event_entry::{EventDetails, EventEntry, EventSummary, EventUpdate};

/// Request body for `POST /events`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// Event title.
    pub title: String,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
    /// Category label used for browsing filters.
    pub category: String,
    /// Event date as an ISO `YYYY-MM-DD` string.
    pub date: String,
    /// Start time (e.g. `"18:00"`).
    pub start_time: String,
    /// End time.
    pub end_time: String,
    /// Venue or address.
    pub location: String,
    /// Maximum number of confirmed registrations.
    pub capacity: u32,
    /// Identifier of the organizing user.
    pub organizer_id: String,
    /// Cover image URL.
    #[serde(default)]
    pub image_url: String,
    /// Whether the event is featured on the discovery page.
    #[serde(default)]
    pub is_featured: bool,
}

impl From<CreateEventRequest> for EventDetails {
    fn from(req: CreateEventRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            category: req.category,
            date: req.date,
            start_time: req.start_time,
            end_time: req.end_time,
            location: req.location,
            capacity: req.capacity,
            organizer_id: req.organizer_id,
            image_url: req.image_url,
            is_featured: req.is_featured,
        }
    }
}

/// Response body for `POST /events` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateEventResponse {
    /// Unique event identifier.
    pub event_id: EventId,
    /// Event title echoed from the request.
    pub title: String,
    /// Category echoed from the request.
    pub category: String,
    /// Capacity echoed from the request.
    pub capacity: u32,
    /// Server creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Request body for `PUT /events/{id}`. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New date.
    pub date: Option<String>,
    /// New start time.
    pub start_time: Option<String>,
    /// New end time.
    pub end_time: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New capacity.
    pub capacity: Option<u32>,
    /// New cover image URL.
    pub image_url: Option<String>,
    /// New featured flag.
    pub is_featured: Option<bool>,
}

impl From<UpdateEventRequest> for EventUpdate {
    fn from(req: UpdateEventRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            category: req.category,
            date: req.date,
            start_time: req.start_time,
            end_time: req.end_time,
            location: req.location,
            capacity: req.capacity,
            image_url: req.image_url,
            is_featured: req.is_featured,
        }
    }
}

/// Full event detail for `GET /events/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventDetailResponse {
    /// Event identifier.
    pub event_id: EventId,
    /// Event title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Event date string.
    pub date: String,
    /// Start time.
    pub start_time: String,
    /// End time.
    pub end_time: String,
    /// Venue or address.
    pub location: String,
    /// Maximum confirmed registrations.
    pub capacity: u32,
    /// Identifier of the organizing user.
    pub organizer_id: String,
    /// Cover image URL.
    pub image_url: String,
    /// Whether the event is featured.
    pub is_featured: bool,
    /// Current confirmed registrations.
    pub confirmed_count: u32,
    /// Current waitlist length.
    pub waitlist_count: u32,
    /// Confirmed spots still available.
    pub spots_remaining: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&EventEntry> for EventDetailResponse {
    fn from(entry: &EventEntry) -> Self {
        Self {
            event_id: entry.event_id,
            title: entry.details.title.clone(),
            description: entry.details.description.clone(),
            category: entry.details.category.clone(),
            date: entry.details.date.clone(),
            start_time: entry.details.start_time.clone(),
            end_time: entry.details.end_time.clone(),
            location: entry.details.location.clone(),
            capacity: entry.details.capacity,
            organizer_id: entry.details.organizer_id.clone(),
            image_url: entry.details.image_url.clone(),
            is_featured: entry.details.is_featured,
            confirmed_count: entry.confirmed_count(),
            waitlist_count: entry.waitlist_count(),
            spots_remaining: entry.spots_remaining(),
            created_at: entry.created_at,
            updated_at: entry.last_modified_at,
        }
    }
}

/// Event summary for list responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventSummaryDto {
    /// Event identifier.
    pub event_id: EventId,
    /// Event title.
    pub title: String,
    /// Category label.
    pub category: String,
    /// Event date string.
    pub date: String,
    /// Venue or address.
    pub location: String,
    /// Maximum confirmed registrations.
    pub capacity: u32,
    /// Current confirmed registrations.
    pub confirmed_count: u32,
    /// Current waitlist length.
    pub waitlist_count: u32,
    /// Whether the event is featured.
    pub is_featured: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<EventSummary> for EventSummaryDto {
    fn from(s: EventSummary) -> Self {
        Self {
            event_id: s.event_id,
            title: s.title,
            category: s.category,
            date: s.date,
            location: s.location,
            capacity: s.capacity,
            confirmed_count: s.confirmed_count,
            waitlist_count: s.waitlist_count,
            is_featured: s.is_featured,
            created_at: s.created_at,
        }
    }
}

/// Paginated list response for `GET /events`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventListResponse {
    /// Event summaries.
    pub data: Vec<EventSummaryDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Filter query parameters for `GET /events`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct EventFilterParams {
    /// Restrict results to a single category.
    pub category: Option<String>,
}
