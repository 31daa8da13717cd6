//! Admission validation and commit endpoint handlers.
//!
//! Business conditions are response shapes, not errors: an unknown token is
//! a 404 with `valid: false`, a wrong calendar day is a 400 carrying both
//! dates, and a second scan of a used token is a 400 carrying the original
//! check-in time. Scanner clients discriminate on field presence.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use persistence::repositories::{
    admission_token::ConsumeResult, AdmissionTokenRepository, CheckInRepository, GuestRepository,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_checkin_attempt, record_validation};
use crate::middleware::OrganizerAuth;
use domain::models::{
    CheckInRecord, EventSummary, Guest, GuestDetails, ListCheckInsQuery, ManualCheckInRequest,
    TokenState, ValidationOutcome,
};
use domain::services::{evaluate_validation, DATE_GATE_MESSAGE};

const INVALID_TOKEN_MESSAGE: &str = "Invalid QR code";
const ALREADY_USED_MESSAGE: &str = "This QR code has already been used";

/// Request body carrying a scanned token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScanRequest {
    pub token: String,
}

/// Successful validation response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ValidationSuccess {
    pub valid: bool,
    pub guest: GuestDetails,
    pub event: EventSummary,
    pub qr_code: TokenState,
}

/// Validation failure for an unknown token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ValidationFailure {
    pub valid: bool,
    pub error: String,
}

/// Validation failure for a scan outside the event's calendar day.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DateIneligibleBody {
    pub valid: bool,
    pub error: String,
    pub event_date: NaiveDate,
    pub current_date: NaiveDate,
}

/// Successful commit response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckinSuccess {
    pub success: bool,
    pub message: String,
    pub guest: CheckedInGuest,
    pub checkin: CheckInRecord,
}

/// Guest fields echoed after a successful commit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckedInGuest {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub checked_in_at: Option<DateTime<Utc>>,
}

impl From<&Guest> for CheckedInGuest {
    fn from(guest: &Guest) -> Self {
        Self {
            id: guest.id,
            full_name: guest.full_name(),
            email: guest.email.clone(),
            checked_in_at: guest.checked_in_at,
        }
    }
}

/// Commit refusal for a token that was consumed earlier.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AlreadyUsedBody {
    pub error: String,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub guest: GuestDetails,
}

fn unknown_token_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ValidationFailure {
            valid: false,
            error: INVALID_TOKEN_MESSAGE.to_string(),
        }),
    )
        .into_response()
}

fn date_ineligible_response(event_date: NaiveDate, current_date: NaiveDate) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(DateIneligibleBody {
            valid: false,
            error: DATE_GATE_MESSAGE.to_string(),
            event_date,
            current_date,
        }),
    )
        .into_response()
}

/// Validate a scanned token without consuming it.
///
/// POST /api/v1/checkin/validate_qr
///
/// Pure read: scanning the same code any number of times yields the same
/// answer and changes nothing.
pub async fn validate_qr(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
    Json(request): Json<ScanRequest>,
) -> Result<Response, ApiError> {
    let today = Utc::now().date_naive();

    // Blank scans are refused without a database round trip.
    let outcome = if !shared::token::has_token_shape(&request.token) {
        ValidationOutcome::unknown_token()
    } else {
        let repo = AdmissionTokenRepository::new(state.pool.clone());
        match repo.resolve(&request.token).await? {
            Some(record) if record.event.organizer_id == auth.organizer_id => {
                evaluate_validation(&record, today)
            }
            // Tokens for another organizer's events are indistinguishable
            // from unknown ones.
            _ => ValidationOutcome::unknown_token(),
        }
    };

    match outcome {
        ValidationOutcome::Valid {
            guest,
            event,
            token_state,
        } => {
            record_validation("valid");
            Ok((
                StatusCode::OK,
                Json(ValidationSuccess {
                    valid: true,
                    guest,
                    event,
                    qr_code: token_state,
                }),
            )
                .into_response())
        }
        ValidationOutcome::DateIneligible {
            event_date,
            current_date,
        } => {
            record_validation("date_ineligible");
            Ok(date_ineligible_response(event_date, current_date))
        }
        ValidationOutcome::InvalidToken { .. } => {
            record_validation("invalid_token");
            Ok(unknown_token_response())
        }
    }
}

/// Consume a scanned token and admit its guest.
///
/// POST /api/v1/checkin/checkin
///
/// Exactly one of any number of concurrent commits for a token succeeds;
/// the rest see the already-used shape. Safe to retry.
pub async fn checkin(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
    Json(request): Json<ScanRequest>,
) -> Result<Response, ApiError> {
    if !shared::token::has_token_shape(&request.token) {
        record_checkin_attempt("invalid_token");
        return Ok(unknown_token_response());
    }

    let repo = AdmissionTokenRepository::new(state.pool.clone());

    let record = match repo.resolve(&request.token).await? {
        Some(record) if record.event.organizer_id == auth.organizer_id => record,
        _ => {
            record_checkin_attempt("invalid_token");
            return Ok(unknown_token_response());
        }
    };

    // Commit re-runs the validator's date gate, so a client that skips
    // validation cannot slip past it.
    let today = Utc::now().date_naive();
    if let ValidationOutcome::DateIneligible {
        event_date,
        current_date,
    } = evaluate_validation(&record, today)
    {
        record_checkin_attempt("date_ineligible");
        return Ok(date_ineligible_response(event_date, current_date));
    }

    let outcome = repo
        .consume_by_token(&request.token, auth.organizer_id, None)
        .await?;
    Ok(commit_response(outcome, "qr_scan"))
}

/// Admit a guest without a scan, keyed by guest ID.
///
/// POST /api/v1/checkin/manual
///
/// Same committer semantics as the QR path, including the date gate and
/// idempotency; the audit row records `method = "manual"`.
pub async fn manual_checkin(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
    Json(request): Json<ManualCheckInRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;

    let guest_repo = GuestRepository::new(state.pool.clone());
    guest_repo
        .find_for_organizer(request.guest_id, auth.organizer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Guest not found".to_string()))?;

    let repo = AdmissionTokenRepository::new(state.pool.clone());
    let record = match repo.find_by_guest(request.guest_id).await? {
        Some(token) => repo.resolve(&token.token).await?,
        None => None,
    };
    let record =
        record.ok_or_else(|| ApiError::NotFound("Guest has no admission token".to_string()))?;

    let today = Utc::now().date_naive();
    if let ValidationOutcome::DateIneligible {
        event_date,
        current_date,
    } = evaluate_validation(&record, today)
    {
        record_checkin_attempt("date_ineligible");
        return Ok(date_ineligible_response(event_date, current_date));
    }

    let outcome = repo
        .consume_for_guest(request.guest_id, auth.organizer_id, request.notes.as_deref())
        .await?;
    Ok(commit_response(outcome, "manual"))
}

/// Shared mapping from a store-level consume outcome to the wire.
fn commit_response(outcome: ConsumeResult, method_label: &str) -> Response {
    match outcome {
        ConsumeResult::Consumed { guest, checkin } => {
            record_checkin_attempt("success");
            info!(
                guest_id = %guest.id,
                checkin_id = %checkin.id,
                method = method_label,
                "Guest checked in"
            );
            (
                StatusCode::OK,
                Json(CheckinSuccess {
                    success: true,
                    message: format!("{} checked in successfully", guest.full_name()),
                    guest: CheckedInGuest::from(&guest),
                    checkin,
                }),
            )
                .into_response()
        }
        ConsumeResult::AlreadyUsed { guest } => {
            record_checkin_attempt("already_checked_in");
            (
                StatusCode::BAD_REQUEST,
                Json(AlreadyUsedBody {
                    error: ALREADY_USED_MESSAGE.to_string(),
                    checked_in_at: guest.checked_in_at,
                    guest: GuestDetails::from(&guest),
                }),
            )
                .into_response()
        }
        ConsumeResult::NotFound => {
            record_checkin_attempt("invalid_token");
            unknown_token_response()
        }
    }
}

/// List check-in audit rows for the organizer's events.
///
/// GET /api/v1/checkin?event=<id>
pub async fn list_checkins(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
    Query(query): Query<ListCheckInsQuery>,
) -> Result<Json<Vec<CheckInRecord>>, ApiError> {
    let repo = CheckInRepository::new(state.pool.clone());
    let checkins = repo
        .list_for_organizer(auth.organizer_id, query.event, query.page, query.per_page)
        .await?;
    Ok(Json(checkins))
}
