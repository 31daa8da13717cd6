//! Closed outcome variants for admission validation and commit.
//!
//! Business conditions (unknown token, wrong day, already checked in) are
//! values, never errors. Callers pattern-match these variants; only transport
//! and database faults travel through error channels.

use chrono::NaiveDate;

use super::admission_token::{AdmissionToken, TokenState};
use super::event::{Event, EventSummary};
use super::guest::{Guest, GuestDetails};

/// A token resolved to its guest and event, as read from the store.
#[derive(Debug, Clone)]
pub struct AdmissionRecord {
    pub token: AdmissionToken,
    pub guest: Guest,
    pub event: Event,
}

/// Result of validating a scanned token. Computed fresh on every call, never
/// persisted, and produced without mutating anything.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The token resolves and today is the event's admission day.
    Valid {
        guest: GuestDetails,
        event: EventSummary,
        token_state: TokenState,
    },
    /// The token does not resolve to any admission credential.
    InvalidToken { reason: String },
    /// The token resolves, but today is not the event's calendar day.
    DateIneligible {
        event_date: NaiveDate,
        current_date: NaiveDate,
    },
}

impl ValidationOutcome {
    /// The standard outcome for a token that resolves to nothing.
    pub fn unknown_token() -> Self {
        ValidationOutcome::InvalidToken {
            reason: "Invalid QR code".to_string(),
        }
    }

    /// Whether the resolved guest has already been admitted.
    pub fn already_checked_in(&self) -> bool {
        matches!(
            self,
            ValidationOutcome::Valid { token_state, .. } if token_state.is_used
        )
    }
}
