//! Event entity for database operations.

use chrono::{DateTime, Utc};
use domain::models::{Event, EventStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for events.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub venue_name: Option<String>,
    pub checkin_start_time: Option<DateTime<Utc>>,
    pub checkin_end_time: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parse a stored status string, falling back to `Draft` for unknown values.
pub(crate) fn parse_status(status: &str) -> EventStatus {
    match status {
        "published" => EventStatus::Published,
        "ongoing" => EventStatus::Ongoing,
        "completed" => EventStatus::Completed,
        "cancelled" => EventStatus::Cancelled,
        _ => EventStatus::Draft,
    }
}

impl From<EventEntity> for Event {
    fn from(entity: EventEntity) -> Self {
        Event {
            id: entity.id,
            organizer_id: entity.organizer_id,
            title: entity.title,
            description: entity.description,
            event_date: entity.event_date,
            location: entity.location,
            venue_name: entity.venue_name,
            checkin_start_time: entity.checkin_start_time,
            checkin_end_time: entity.checkin_end_time,
            status: parse_status(&entity.status),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
