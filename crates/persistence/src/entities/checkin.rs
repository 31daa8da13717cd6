//! Check-in audit entity for database operations.

use chrono::{DateTime, Utc};
use domain::models::{CheckInMethod, CheckInRecord};
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for check-in audit rows.
#[derive(Debug, Clone, FromRow)]
pub struct CheckInEntity {
    pub id: Uuid,
    pub guest_id: Uuid,
    pub checked_in_by: Uuid,
    pub method: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn parse_method(method: &str) -> CheckInMethod {
    match method {
        "manual" => CheckInMethod::Manual,
        _ => CheckInMethod::QrScan,
    }
}

impl From<CheckInEntity> for CheckInRecord {
    fn from(entity: CheckInEntity) -> Self {
        CheckInRecord {
            id: entity.id,
            guest_id: entity.guest_id,
            checked_in_by: entity.checked_in_by,
            method: parse_method(&entity.method),
            notes: entity.notes,
            created_at: entity.created_at,
        }
    }
}
