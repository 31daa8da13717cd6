//! Check-in audit repository for database operations.
//!
//! Audit rows are written by the admission token repository inside the
//! consume transaction; this repository only reads them back.

use domain::models::CheckInRecord;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CheckInEntity;
use crate::metrics::QueryTimer;

const DEFAULT_PAGE_SIZE: u32 = 50;
const MAX_PAGE_SIZE: u32 = 200;

/// Repository for check-in audit queries.
#[derive(Clone)]
pub struct CheckInRepository {
    pool: PgPool,
}

impl CheckInRepository {
    /// Creates a new CheckInRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List check-ins for an organizer's events, optionally filtered to one
    /// event, newest first.
    pub async fn list_for_organizer(
        &self,
        organizer_id: Uuid,
        event_id: Option<Uuid>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Vec<CheckInRecord>, sqlx::Error> {
        let timer = QueryTimer::new("list_checkins_for_organizer");
        let per_page = per_page.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        let offset = page.unwrap_or(1).saturating_sub(1) as i64 * per_page as i64;

        let result = sqlx::query_as::<_, CheckInEntity>(
            r#"
            SELECT c.id, c.guest_id, c.checked_in_by, c.method, c.notes, c.created_at
            FROM checkins c
            JOIN guests g ON g.id = c.guest_id
            JOIN events e ON e.id = g.event_id
            WHERE e.organizer_id = $1 AND ($2::uuid IS NULL OR e.id = $2)
            ORDER BY c.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(organizer_id)
        .bind(event_id)
        .bind(per_page as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result.map(|entities| entities.into_iter().map(Into::into).collect())
    }
}
