//! Admission token domain model.
//!
//! An admission token is the one-time-consumable credential encoded in a
//! guest's QR code. Exactly one token exists per guest; regenerating replaces
//! the previous one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Admission token domain model.
///
/// Invariant: `is_used == true` exactly when `used_at` is set; once used, a
/// token never reverts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdmissionToken {
    pub id: Uuid,
    pub guest_id: Uuid,
    pub token: String,
    pub is_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdmissionToken {
    /// Whether the credential has already been consumed.
    pub fn is_consumed(&self) -> bool {
        self.is_used
    }

    /// Consistency check for the is_used/used_at pairing.
    pub fn state_is_consistent(&self) -> bool {
        self.is_used == self.used_at.is_some()
    }
}

/// Consumption state embedded in validation responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TokenState {
    pub is_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<Utc>>,
}

impl From<&AdmissionToken> for TokenState {
    fn from(token: &AdmissionToken) -> Self {
        Self {
            is_used: token.is_used,
            used_at: token.used_at,
        }
    }
}
