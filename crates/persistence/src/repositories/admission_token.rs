//! Admission token repository for database operations.
//!
//! Holds the single spot in the system where a token's consumption is
//! decided: a conditional UPDATE that flips `is_used` only when it is still
//! FALSE, so exactly one of any number of concurrent scans wins.

use domain::models::{AdmissionRecord, AdmissionToken, CheckInMethod, CheckInRecord, Guest};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{AdmissionRecordRow, AdmissionTokenEntity, CheckInEntity, GuestEntity};
use crate::metrics::QueryTimer;

const RECORD_COLUMNS: &str = r#"
    t.id AS token_id, t.token, t.is_used, t.used_at,
    t.created_at AS token_created_at, t.updated_at AS token_updated_at,
    g.id AS guest_id, g.first_name, g.last_name, g.email, g.phone_number, g.company,
    g.has_checked_in, g.checked_in_at, g.checked_in_by,
    g.created_at AS guest_created_at, g.updated_at AS guest_updated_at,
    e.id AS event_id, e.organizer_id, e.title, e.description, e.event_date, e.location,
    e.venue_name, e.checkin_start_time, e.checkin_end_time, e.status,
    e.created_at AS event_created_at, e.updated_at AS event_updated_at
"#;

/// Outcome of an attempt to consume a token.
#[derive(Debug)]
pub enum ConsumeResult {
    /// This attempt won: guest state mirrored and audit row written.
    Consumed {
        guest: Guest,
        checkin: CheckInRecord,
    },
    /// The token was consumed before this attempt reached the UPDATE.
    AlreadyUsed { guest: Guest },
    /// No token matched.
    NotFound,
}

/// Outcome of a token regeneration request.
#[derive(Debug)]
pub enum RegenerateResult {
    /// A fresh token value now replaces the previous one.
    Regenerated(AdmissionToken),
    /// The existing token has been consumed; regeneration is refused.
    AlreadyUsed,
    /// The guest does not exist.
    GuestNotFound,
}

/// Repository for admission token database operations.
#[derive(Clone)]
pub struct AdmissionTokenRepository {
    pool: PgPool,
}

impl AdmissionTokenRepository {
    /// Creates a new AdmissionTokenRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a token value to its token, guest, and event in one query.
    ///
    /// Read-only: resolving never changes consumption state, so the same
    /// token can be looked up any number of times with the same result.
    pub async fn resolve(&self, token: &str) -> Result<Option<AdmissionRecord>, sqlx::Error> {
        let timer = QueryTimer::new("resolve_admission_token");
        let result = sqlx::query_as::<_, AdmissionRecordRow>(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM admission_tokens t
            JOIN guests g ON g.id = t.guest_id
            JOIN events e ON e.id = g.event_id
            WHERE t.token = $1
            "#,
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|opt| opt.map(Into::into))
    }

    /// Find the token belonging to a guest.
    pub async fn find_by_guest(
        &self,
        guest_id: Uuid,
    ) -> Result<Option<AdmissionToken>, sqlx::Error> {
        let timer = QueryTimer::new("find_token_by_guest");
        let result = sqlx::query_as::<_, AdmissionTokenEntity>(
            r#"
            SELECT id, guest_id, token, is_used, used_at, created_at, updated_at
            FROM admission_tokens
            WHERE guest_id = $1
            "#,
        )
        .bind(guest_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|opt| opt.map(Into::into))
    }

    /// Consume a token by its scanned value.
    pub async fn consume_by_token(
        &self,
        token: &str,
        checked_in_by: Uuid,
        notes: Option<&str>,
    ) -> Result<ConsumeResult, sqlx::Error> {
        let timer = QueryTimer::new("consume_token_by_value");
        let result = self
            .consume_where("t.token = $1", TokenSelector::Value(token), checked_in_by, CheckInMethod::QrScan, notes)
            .await;
        timer.record();
        result
    }

    /// Consume the token belonging to a guest (manual check-in path).
    pub async fn consume_for_guest(
        &self,
        guest_id: Uuid,
        checked_in_by: Uuid,
        notes: Option<&str>,
    ) -> Result<ConsumeResult, sqlx::Error> {
        let timer = QueryTimer::new("consume_token_for_guest");
        let result = self
            .consume_where("t.guest_id = $1", TokenSelector::Guest(guest_id), checked_in_by, CheckInMethod::Manual, notes)
            .await;
        timer.record();
        result
    }

    async fn consume_where(
        &self,
        predicate: &str,
        selector: TokenSelector<'_>,
        checked_in_by: Uuid,
        method: CheckInMethod,
        notes: Option<&str>,
    ) -> Result<ConsumeResult, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // The WHERE clause on is_used is what arbitrates concurrent scans.
        let flipped = {
            let sql = format!(
                r#"
                UPDATE admission_tokens t
                SET is_used = TRUE, used_at = NOW(), updated_at = NOW()
                WHERE {predicate} AND is_used = FALSE
                RETURNING id, guest_id, token, is_used, used_at, created_at, updated_at
                "#,
            );
            let query = sqlx::query_as::<_, AdmissionTokenEntity>(&sql);
            match selector {
                TokenSelector::Value(token) => query.bind(token),
                TokenSelector::Guest(guest_id) => query.bind(guest_id),
            }
            .fetch_optional(&mut *tx)
            .await?
        };

        let Some(token_entity) = flipped else {
            tx.rollback().await?;
            return self.classify_missed_consume(selector).await;
        };

        let guest = sqlx::query_as::<_, GuestEntity>(
            r#"
            UPDATE guests
            SET has_checked_in = TRUE, checked_in_at = $2, checked_in_by = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, event_id, first_name, last_name, email, phone_number, company,
                      has_checked_in, checked_in_at, checked_in_by, created_at, updated_at
            "#,
        )
        .bind(token_entity.guest_id)
        .bind(token_entity.used_at)
        .bind(checked_in_by)
        .fetch_one(&mut *tx)
        .await?;

        let checkin = sqlx::query_as::<_, CheckInEntity>(
            r#"
            INSERT INTO checkins (guest_id, checked_in_by, method, notes, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, guest_id, checked_in_by, method, notes, created_at
            "#,
        )
        .bind(token_entity.guest_id)
        .bind(checked_in_by)
        .bind(method.as_str())
        .bind(notes)
        .bind(token_entity.used_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ConsumeResult::Consumed {
            guest: guest.into(),
            checkin: checkin.into(),
        })
    }

    /// After a zero-row UPDATE, distinguish "already used" from "no such token".
    async fn classify_missed_consume(
        &self,
        selector: TokenSelector<'_>,
    ) -> Result<ConsumeResult, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT g.id, g.event_id, g.first_name, g.last_name, g.email, g.phone_number,
                   g.company, g.has_checked_in, g.checked_in_at, g.checked_in_by,
                   g.created_at, g.updated_at
            FROM admission_tokens t
            JOIN guests g ON g.id = t.guest_id
            WHERE {}
            "#,
            match selector {
                TokenSelector::Value(_) => "t.token = $1",
                TokenSelector::Guest(_) => "t.guest_id = $1",
            },
        );
        let query = sqlx::query_as::<_, GuestEntity>(&sql);
        let guest = match selector {
            TokenSelector::Value(token) => query.bind(token),
            TokenSelector::Guest(guest_id) => query.bind(guest_id),
        }
        .fetch_optional(&self.pool)
        .await?;

        Ok(match guest {
            Some(guest) => ConsumeResult::AlreadyUsed {
                guest: guest.into(),
            },
            None => ConsumeResult::NotFound,
        })
    }

    /// Replace a guest's token with a fresh value, or provision one if the
    /// guest has none yet. Refused once the existing token is consumed:
    /// admission history must stay traceable to the credential that was used.
    pub async fn regenerate_for_guest(
        &self,
        guest_id: Uuid,
    ) -> Result<RegenerateResult, sqlx::Error> {
        let timer = QueryTimer::new("regenerate_token_for_guest");
        let token_value = shared::token::generate_admission_token();

        let result = async {
            let replaced = sqlx::query_as::<_, AdmissionTokenEntity>(
                r#"
                UPDATE admission_tokens
                SET token = $2, updated_at = NOW()
                WHERE guest_id = $1 AND is_used = FALSE
                RETURNING id, guest_id, token, is_used, used_at, created_at, updated_at
                "#,
            )
            .bind(guest_id)
            .bind(&token_value)
            .fetch_optional(&self.pool)
            .await?;

            if let Some(entity) = replaced {
                return Ok(RegenerateResult::Regenerated(entity.into()));
            }

            let existing = sqlx::query_scalar::<_, bool>(
                "SELECT is_used FROM admission_tokens WHERE guest_id = $1",
            )
            .bind(guest_id)
            .fetch_optional(&self.pool)
            .await?;

            match existing {
                Some(_) => Ok(RegenerateResult::AlreadyUsed),
                None => {
                    let guest_exists = sqlx::query_scalar::<_, bool>(
                        "SELECT EXISTS(SELECT 1 FROM guests WHERE id = $1)",
                    )
                    .bind(guest_id)
                    .fetch_one(&self.pool)
                    .await?;
                    if !guest_exists {
                        return Ok(RegenerateResult::GuestNotFound);
                    }

                    let created = sqlx::query_as::<_, AdmissionTokenEntity>(
                        r#"
                        INSERT INTO admission_tokens (guest_id, token)
                        VALUES ($1, $2)
                        RETURNING id, guest_id, token, is_used, used_at, created_at, updated_at
                        "#,
                    )
                    .bind(guest_id)
                    .bind(&token_value)
                    .fetch_one(&self.pool)
                    .await?;
                    Ok(RegenerateResult::Regenerated(created.into()))
                }
            }
        }
        .await;
        timer.record();
        result
    }
}

enum TokenSelector<'a> {
    Value(&'a str),
    Guest(Uuid),
}
