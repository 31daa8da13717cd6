//! Guest domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Guest domain model.
///
/// `has_checked_in` and `checked_in_at` mirror the guest's admission token
/// state; the committer keeps both sides in step inside one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Guest {
    pub id: Uuid,
    pub event_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub has_checked_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Guest {
    /// The guest's display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Request to add a guest to an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateGuestRequest {
    #[validate(length(min = 1, max = 100, message = "first_name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "last_name must be 1-100 characters"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Compact guest representation embedded in validation responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GuestDetails {
    pub id: Uuid,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub has_checked_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in_at: Option<DateTime<Utc>>,
}

impl From<&Guest> for GuestDetails {
    fn from(guest: &Guest) -> Self {
        Self {
            id: guest.id,
            full_name: guest.full_name(),
            first_name: guest.first_name.clone(),
            last_name: guest.last_name.clone(),
            email: guest.email.clone(),
            phone_number: guest.phone_number.clone(),
            company: guest.company.clone(),
            has_checked_in: guest.has_checked_in,
            checked_in_at: guest.checked_in_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_guest() -> Guest {
        Guest {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone_number: None,
            company: Some("Acme".to_string()),
            has_checked_in: false,
            checked_in_at: None,
            checked_in_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(sample_guest().full_name(), "Jane Doe");
    }

    #[test]
    fn test_guest_details_from_guest() {
        let guest = sample_guest();
        let details = GuestDetails::from(&guest);
        assert_eq!(details.full_name, "Jane Doe");
        assert_eq!(details.email, guest.email);
        assert!(!details.has_checked_in);
        assert!(details.checked_in_at.is_none());
    }

    #[test]
    fn test_create_request_invalid_email_rejected() {
        let request = CreateGuestRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "not-an-email".to_string(),
            phone_number: None,
            company: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_validation() {
        let request = CreateGuestRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone_number: Some("+4915112345678".to_string()),
            company: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_accepts_generated_guests() {
        use fake::faker::internet::en::SafeEmail;
        use fake::faker::name::en::{FirstName, LastName};
        use fake::Fake;

        for _ in 0..20 {
            let request = CreateGuestRequest {
                first_name: FirstName().fake(),
                last_name: LastName().fake(),
                email: SafeEmail().fake(),
                phone_number: None,
                company: None,
            };
            assert!(request.validate().is_ok(), "Rejected: {:?}", request);
        }
    }
}
