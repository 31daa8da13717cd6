//! Event domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Lifecycle status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Published,
    Ongoing,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Published => "published",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

/// Event domain model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_name: Option<String>,
    // Check-in window fields are stored but not consulted by the admission
    // date gate, which compares calendar days only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkin_start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkin_end_time: Option<DateTime<Utc>>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// The calendar day on which admission is permitted.
    pub fn admission_day(&self) -> NaiveDate {
        self.event_date.date_naive()
    }

    /// Check whether the given calendar day is the event's admission day.
    ///
    /// Equality of year/month/day only; time of day is ignored.
    pub fn is_admission_day(&self, today: NaiveDate) -> bool {
        self.admission_day() == today
    }
}

/// Request to create a new event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    #[validate(length(min = 1, max = 500, message = "location must be 1-500 characters"))]
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkin_start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkin_end_time: Option<DateTime<Utc>>,
}

/// Compact event representation embedded in validation responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventSummary {
    pub id: Uuid,
    pub title: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_name: Option<String>,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            event_date: event.event_date,
            location: event.location.clone(),
            venue_name: event.venue_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event_on(date: DateTime<Utc>) -> Event {
        Event {
            id: Uuid::new_v4(),
            organizer_id: Uuid::new_v4(),
            title: "Launch Party".to_string(),
            description: None,
            event_date: date,
            location: "Berlin".to_string(),
            venue_name: Some("Kraftwerk".to_string()),
            checkin_start_time: None,
            checkin_end_time: None,
            status: EventStatus::Published,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_admission_day_truncates_time() {
        let event = event_on(Utc.with_ymd_and_hms(2024, 2, 15, 19, 30, 0).unwrap());
        assert_eq!(
            event.admission_day(),
            NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()
        );
    }

    #[test]
    fn test_is_admission_day_matches_calendar_day() {
        let event = event_on(Utc.with_ymd_and_hms(2024, 2, 15, 19, 30, 0).unwrap());
        assert!(event.is_admission_day(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()));
        assert!(!event.is_admission_day(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap()));
        assert!(!event.is_admission_day(NaiveDate::from_ymd_opt(2024, 2, 16).unwrap()));
    }

    #[test]
    fn test_create_request_validation() {
        let request = CreateEventRequest {
            title: "Launch Party".to_string(),
            description: None,
            event_date: Utc::now(),
            location: "Berlin".to_string(),
            venue_name: None,
            checkin_start_time: None,
            checkin_end_time: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_empty_title_rejected() {
        let request = CreateEventRequest {
            title: String::new(),
            description: None,
            event_date: Utc::now(),
            location: "Berlin".to_string(),
            venue_name: None,
            checkin_start_time: None,
            checkin_end_time: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_event_status_as_str() {
        assert_eq!(EventStatus::Draft.as_str(), "draft");
        assert_eq!(EventStatus::Published.as_str(), "published");
    }
}
