//! Guest repository for database operations.

use domain::models::{AdmissionToken, CreateGuestRequest, Guest};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{AdmissionTokenEntity, GuestEntity};
use crate::metrics::QueryTimer;

const GUEST_COLUMNS: &str = "id, event_id, first_name, last_name, email, phone_number, company, \
                             has_checked_in, checked_in_at, checked_in_by, created_at, updated_at";

/// Repository for guest-related database operations.
#[derive(Clone)]
pub struct GuestRepository {
    pool: PgPool,
}

impl GuestRepository {
    /// Creates a new GuestRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a guest and provision their admission token in one transaction.
    ///
    /// Every guest carries exactly one token from the moment they exist, so
    /// a QR code can always be issued without a separate provisioning step.
    pub async fn create(
        &self,
        event_id: Uuid,
        request: &CreateGuestRequest,
    ) -> Result<(Guest, AdmissionToken), sqlx::Error> {
        let timer = QueryTimer::new("create_guest");
        let token_value = shared::token::generate_admission_token();

        let result = async {
            let mut tx = self.pool.begin().await?;

            let guest = sqlx::query_as::<_, GuestEntity>(&format!(
                r#"
                INSERT INTO guests (event_id, first_name, last_name, email, phone_number, company)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING {GUEST_COLUMNS}
                "#,
            ))
            .bind(event_id)
            .bind(&request.first_name)
            .bind(&request.last_name)
            .bind(&request.email)
            .bind(&request.phone_number)
            .bind(&request.company)
            .fetch_one(&mut *tx)
            .await?;

            let token = sqlx::query_as::<_, AdmissionTokenEntity>(
                r#"
                INSERT INTO admission_tokens (guest_id, token)
                VALUES ($1, $2)
                RETURNING id, guest_id, token, is_used, used_at, created_at, updated_at
                "#,
            )
            .bind(guest.id)
            .bind(&token_value)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok((guest.into(), token.into()))
        }
        .await;
        timer.record();
        result
    }

    /// Find a guest by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Guest>, sqlx::Error> {
        let timer = QueryTimer::new("find_guest_by_id");
        let result = sqlx::query_as::<_, GuestEntity>(&format!(
            r#"
            SELECT {GUEST_COLUMNS}
            FROM guests
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|opt| opt.map(Into::into))
    }

    /// Find a guest by ID, scoped to events owned by the given organizer.
    pub async fn find_for_organizer(
        &self,
        id: Uuid,
        organizer_id: Uuid,
    ) -> Result<Option<Guest>, sqlx::Error> {
        let timer = QueryTimer::new("find_guest_for_organizer");
        let result = sqlx::query_as::<_, GuestEntity>(
            r#"
            SELECT g.id, g.event_id, g.first_name, g.last_name, g.email, g.phone_number,
                   g.company, g.has_checked_in, g.checked_in_at, g.checked_in_by,
                   g.created_at, g.updated_at
            FROM guests g
            JOIN events e ON e.id = g.event_id
            WHERE g.id = $1 AND e.organizer_id = $2
            "#,
        )
        .bind(id)
        .bind(organizer_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|opt| opt.map(Into::into))
    }

    /// List all guests registered for an event, in registration order.
    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Guest>, sqlx::Error> {
        let timer = QueryTimer::new("list_guests_for_event");
        let result = sqlx::query_as::<_, GuestEntity>(&format!(
            r#"
            SELECT {GUEST_COLUMNS}
            FROM guests
            WHERE event_id = $1
            ORDER BY created_at ASC
            "#,
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result.map(|entities| entities.into_iter().map(Into::into).collect())
    }
}
