//! Closed outcome types for the two admission calls, plus the trait the
//! session machine is written against.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use domain::models::{CheckInRecord, EventSummary, GuestDetails, TokenState};

use crate::error::ScannerError;

/// Result of a validation call, decoded from the wire at the boundary.
#[derive(Debug, Clone)]
pub enum ValidateOutcome {
    /// Token resolves and today is the event day. `qr_code.is_used` tells
    /// the operator whether this guest was admitted earlier.
    Valid {
        guest: GuestDetails,
        event: EventSummary,
        qr_code: TokenState,
    },
    /// The server does not recognize the token.
    Invalid { message: String },
    /// The token is real but today is not the event's calendar day.
    WrongDay {
        event_date: NaiveDate,
        current_date: NaiveDate,
        message: String,
    },
}

/// Result of a commit call.
#[derive(Debug, Clone)]
pub enum CheckinOutcome {
    /// This commit consumed the token.
    CheckedIn {
        message: String,
        guest: CheckedInGuest,
        checkin: CheckInRecord,
    },
    /// The token was consumed earlier; the guest is already inside.
    AlreadyCheckedIn {
        message: String,
        guest: GuestDetails,
        checked_in_at: Option<DateTime<Utc>>,
    },
    Invalid {
        message: String,
    },
    WrongDay {
        event_date: NaiveDate,
        current_date: NaiveDate,
        message: String,
    },
}

/// Guest fields the server echoes after a successful commit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckedInGuest {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub checked_in_at: Option<DateTime<Utc>>,
}

/// The admission API as the session machine sees it.
///
/// Implemented by [`crate::CheckinClient`] over HTTP and by in-memory fakes
/// in tests.
#[async_trait]
pub trait AdmissionApi: Send + Sync {
    /// Validate a scanned token without consuming it.
    async fn validate_token(&self, token: &str) -> Result<ValidateOutcome, ScannerError>;

    /// Consume a token, admitting its guest.
    async fn commit_token(&self, token: &str) -> Result<CheckinOutcome, ScannerError>;
}
