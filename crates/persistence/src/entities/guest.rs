//! Guest entity for database operations.

use chrono::{DateTime, Utc};
use domain::models::Guest;
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for guests.
#[derive(Debug, Clone, FromRow)]
pub struct GuestEntity {
    pub id: Uuid,
    pub event_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub company: Option<String>,
    pub has_checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub checked_in_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GuestEntity> for Guest {
    fn from(entity: GuestEntity) -> Self {
        Guest {
            id: entity.id,
            event_id: entity.event_id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
            phone_number: entity.phone_number,
            company: entity.company,
            has_checked_in: entity.has_checked_in,
            checked_in_at: entity.checked_in_at,
            checked_in_by: entity.checked_in_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_entity_to_domain() {
        let now = Utc::now();
        let entity = GuestEntity {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone_number: Some("+4915112345678".to_string()),
            company: None,
            has_checked_in: true,
            checked_in_at: Some(now),
            checked_in_by: Some(Uuid::new_v4()),
            created_at: now,
            updated_at: now,
        };

        let guest: Guest = entity.clone().into();
        assert_eq!(guest.id, entity.id);
        assert_eq!(guest.full_name(), "Jane Doe");
        assert!(guest.has_checked_in);
        assert_eq!(guest.checked_in_at, Some(now));
    }
}
