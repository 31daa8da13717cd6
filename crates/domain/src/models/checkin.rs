//! Check-in audit record domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// How an admission was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInMethod {
    QrScan,
    Manual,
}

impl CheckInMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckInMethod::QrScan => "qr_scan",
            CheckInMethod::Manual => "manual",
        }
    }
}

/// One admission, recorded at the moment the token was consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckInRecord {
    pub id: Uuid,
    pub guest_id: Uuid,
    pub checked_in_by: Uuid,
    pub method: CheckInMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for manual (non-QR) check-in.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ManualCheckInRequest {
    pub guest_id: Uuid,
    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Query parameters for listing check-ins.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListCheckInsQuery {
    pub event: Option<Uuid>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}
