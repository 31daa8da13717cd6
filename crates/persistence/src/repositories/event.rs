//! Event repository for database operations.

use domain::models::{CreateEventRequest, Event};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EventEntity;
use crate::metrics::QueryTimer;

const EVENT_COLUMNS: &str = "id, organizer_id, title, description, event_date, location, \
                             venue_name, checkin_start_time, checkin_end_time, status, \
                             created_at, updated_at";

/// Repository for event-related database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event owned by the given organizer.
    pub async fn create(
        &self,
        organizer_id: Uuid,
        request: &CreateEventRequest,
    ) -> Result<Event, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            INSERT INTO events (organizer_id, title, description, event_date, location,
                                venue_name, checkin_start_time, checkin_end_time, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'draft')
            RETURNING {EVENT_COLUMNS}
            "#,
        ))
        .bind(organizer_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.event_date)
        .bind(&request.location)
        .bind(&request.venue_name)
        .bind(request.checkin_start_time)
        .bind(request.checkin_end_time)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Into::into)
    }

    /// Find an event by ID, scoped to its owning organizer.
    pub async fn find_for_organizer(
        &self,
        id: Uuid,
        organizer_id: Uuid,
    ) -> Result<Option<Event>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_for_organizer");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE id = $1 AND organizer_id = $2
            "#,
        ))
        .bind(id)
        .bind(organizer_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|opt| opt.map(Into::into))
    }

    /// List all events owned by an organizer, newest event date first.
    pub async fn list_for_organizer(&self, organizer_id: Uuid) -> Result<Vec<Event>, sqlx::Error> {
        let timer = QueryTimer::new("list_events_for_organizer");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE organizer_id = $1
            ORDER BY event_date DESC
            "#,
        ))
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result.map(|entities| entities.into_iter().map(Into::into).collect())
    }
}
