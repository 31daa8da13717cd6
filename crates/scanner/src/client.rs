//! HTTP client for the admission API.
//!
//! Decodes wire shapes into the closed outcome enums right at the boundary;
//! nothing downstream re-inspects raw JSON. A 401 from any call fires the
//! configured unauthorized handler so the host application can tear down the
//! operator session.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use domain::models::{CheckInRecord, EventSummary, GuestDetails, TokenState};

use crate::error::ScannerError;
use crate::outcome::{AdmissionApi, CheckedInGuest, CheckinOutcome, ValidateOutcome};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Callback invoked when the server rejects the session with a 401.
pub type UnauthorizedHandler = Arc<dyn Fn() + Send + Sync>;

/// Typed client for the check-in endpoints.
pub struct CheckinClient {
    http: Client,
    base_url: String,
    access_token: String,
    on_unauthorized: Option<UnauthorizedHandler>,
}

#[derive(Debug, Deserialize)]
struct ValidationSuccessWire {
    guest: GuestDetails,
    event: EventSummary,
    qr_code: TokenState,
}

#[derive(Debug, Deserialize)]
struct CheckinSuccessWire {
    message: String,
    guest: CheckedInGuest,
    checkin: CheckInRecord,
}

/// Refusal body; which fields are present determines the outcome.
#[derive(Debug, Deserialize)]
struct RefusalWire {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    event_date: Option<NaiveDate>,
    #[serde(default)]
    current_date: Option<NaiveDate>,
    #[serde(default)]
    checked_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    guest: Option<GuestDetails>,
}

impl RefusalWire {
    fn message(&self) -> String {
        self.error.clone().unwrap_or_else(|| "Request refused".to_string())
    }
}

impl CheckinClient {
    /// Create a client for the given API base URL and bearer token.
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, ScannerError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ScannerError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            on_unauthorized: None,
        })
    }

    /// Register a callback for 401 responses.
    pub fn with_unauthorized_handler(mut self, handler: UnauthorizedHandler) -> Self {
        self.on_unauthorized = Some(handler);
        self
    }

    async fn post_token(&self, path: &str, token: &str) -> Result<Response, ScannerError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!(path, "Session rejected with 401");
            if let Some(handler) = &self.on_unauthorized {
                handler();
            }
            return Err(ScannerError::SessionExpired);
        }

        Ok(response)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<T, ScannerError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ScannerError::MalformedBody(e.to_string()))
    }

    fn refusal_to_validate(refusal: RefusalWire) -> ValidateOutcome {
        match (refusal.event_date, refusal.current_date) {
            (Some(event_date), Some(current_date)) => ValidateOutcome::WrongDay {
                event_date,
                current_date,
                message: refusal.message(),
            },
            _ => ValidateOutcome::Invalid {
                message: refusal.message(),
            },
        }
    }

    fn refusal_to_checkin(refusal: RefusalWire) -> Result<CheckinOutcome, ScannerError> {
        if let (Some(event_date), Some(current_date)) =
            (refusal.event_date, refusal.current_date)
        {
            return Ok(CheckinOutcome::WrongDay {
                event_date,
                current_date,
                message: refusal.message(),
            });
        }

        if refusal.checked_in_at.is_some() {
            let message = refusal.message();
            let guest = refusal.guest.ok_or_else(|| {
                ScannerError::MalformedBody("already-used refusal without guest".to_string())
            })?;
            return Ok(CheckinOutcome::AlreadyCheckedIn {
                message,
                checked_in_at: refusal.checked_in_at,
                guest,
            });
        }

        Ok(CheckinOutcome::Invalid {
            message: refusal.message(),
        })
    }
}

#[async_trait]
impl AdmissionApi for CheckinClient {
    async fn validate_token(&self, token: &str) -> Result<ValidateOutcome, ScannerError> {
        let response = self.post_token("/api/v1/checkin/validate_qr", token).await?;

        match response.status() {
            StatusCode::OK => {
                let body: ValidationSuccessWire = Self::decode(response).await?;
                Ok(ValidateOutcome::Valid {
                    guest: body.guest,
                    event: body.event,
                    qr_code: body.qr_code,
                })
            }
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                let refusal: RefusalWire = Self::decode(response).await?;
                Ok(Self::refusal_to_validate(refusal))
            }
            status => Err(ScannerError::UnexpectedStatus(status.as_u16())),
        }
    }

    async fn commit_token(&self, token: &str) -> Result<CheckinOutcome, ScannerError> {
        let response = self.post_token("/api/v1/checkin/checkin", token).await?;

        match response.status() {
            StatusCode::OK => {
                let body: CheckinSuccessWire = Self::decode(response).await?;
                Ok(CheckinOutcome::CheckedIn {
                    message: body.message,
                    guest: body.guest,
                    checkin: body.checkin,
                })
            }
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                let refusal: RefusalWire = Self::decode(response).await?;
                Self::refusal_to_checkin(refusal)
            }
            status => Err(ScannerError::UnexpectedStatus(status.as_u16())),
        }
    }
}
