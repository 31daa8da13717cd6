//! Admission token entities for database operations.

use chrono::{DateTime, Utc};
use domain::models::{AdmissionRecord, AdmissionToken, Event, Guest};
use sqlx::FromRow;
use uuid::Uuid;

use super::event::parse_status;

/// Database entity for admission tokens.
#[derive(Debug, Clone, FromRow)]
pub struct AdmissionTokenEntity {
    pub id: Uuid,
    pub guest_id: Uuid,
    pub token: String,
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AdmissionTokenEntity> for AdmissionToken {
    fn from(entity: AdmissionTokenEntity) -> Self {
        AdmissionToken {
            id: entity.id,
            guest_id: entity.guest_id,
            token: entity.token,
            is_used: entity.is_used,
            used_at: entity.used_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Joined row produced when resolving a token to its guest and event.
///
/// Column names carry table prefixes so a single SELECT can hydrate all
/// three models without a second round trip.
#[derive(Debug, Clone, FromRow)]
pub struct AdmissionRecordRow {
    pub token_id: Uuid,
    pub token: String,
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub token_created_at: DateTime<Utc>,
    pub token_updated_at: DateTime<Utc>,

    pub guest_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub company: Option<String>,
    pub has_checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub checked_in_by: Option<Uuid>,
    pub guest_created_at: DateTime<Utc>,
    pub guest_updated_at: DateTime<Utc>,

    pub event_id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub venue_name: Option<String>,
    pub checkin_start_time: Option<DateTime<Utc>>,
    pub checkin_end_time: Option<DateTime<Utc>>,
    pub status: String,
    pub event_created_at: DateTime<Utc>,
    pub event_updated_at: DateTime<Utc>,
}

impl From<AdmissionRecordRow> for AdmissionRecord {
    fn from(row: AdmissionRecordRow) -> Self {
        AdmissionRecord {
            token: AdmissionToken {
                id: row.token_id,
                guest_id: row.guest_id,
                token: row.token,
                is_used: row.is_used,
                used_at: row.used_at,
                created_at: row.token_created_at,
                updated_at: row.token_updated_at,
            },
            guest: Guest {
                id: row.guest_id,
                event_id: row.event_id,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                phone_number: row.phone_number,
                company: row.company,
                has_checked_in: row.has_checked_in,
                checked_in_at: row.checked_in_at,
                checked_in_by: row.checked_in_by,
                created_at: row.guest_created_at,
                updated_at: row.guest_updated_at,
            },
            event: Event {
                id: row.event_id,
                organizer_id: row.organizer_id,
                title: row.title,
                description: row.description,
                event_date: row.event_date,
                location: row.location,
                venue_name: row.venue_name,
                checkin_start_time: row.checkin_start_time,
                checkin_end_time: row.checkin_end_time,
                status: parse_status(&row.status),
                created_at: row.event_created_at,
                updated_at: row.event_updated_at,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::EventStatus;

    #[test]
    fn test_token_entity_to_domain() {
        let now = Utc::now();
        let entity = AdmissionTokenEntity {
            id: Uuid::new_v4(),
            guest_id: Uuid::new_v4(),
            token: "adm_abc123".to_string(),
            is_used: false,
            used_at: None,
            created_at: now,
            updated_at: now,
        };

        let token: AdmissionToken = entity.clone().into();
        assert_eq!(token.id, entity.id);
        assert!(!token.is_consumed());
        assert!(token.state_is_consistent());
    }

    #[test]
    fn test_record_row_to_domain() {
        let now = Utc::now();
        let guest_id = Uuid::new_v4();
        let event_id = Uuid::new_v4();
        let row = AdmissionRecordRow {
            token_id: Uuid::new_v4(),
            token: "adm_abc123".to_string(),
            is_used: true,
            used_at: Some(now),
            token_created_at: now,
            token_updated_at: now,
            guest_id,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone_number: None,
            company: None,
            has_checked_in: true,
            checked_in_at: Some(now),
            checked_in_by: Some(Uuid::new_v4()),
            guest_created_at: now,
            guest_updated_at: now,
            event_id,
            organizer_id: Uuid::new_v4(),
            title: "Launch Party".to_string(),
            description: None,
            event_date: now,
            location: "Berlin".to_string(),
            venue_name: None,
            checkin_start_time: None,
            checkin_end_time: None,
            status: "published".to_string(),
            event_created_at: now,
            event_updated_at: now,
        };

        let record: AdmissionRecord = row.into();
        assert_eq!(record.guest.id, guest_id);
        assert_eq!(record.guest.event_id, event_id);
        assert_eq!(record.token.guest_id, guest_id);
        assert!(record.token.is_consumed());
        assert_eq!(record.event.status, EventStatus::Published);
    }
}
