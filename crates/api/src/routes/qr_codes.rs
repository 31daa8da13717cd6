//! QR token issuance endpoint handlers.

use axum::{extract::State, http::StatusCode, Extension, Json};
use persistence::repositories::{
    admission_token::RegenerateResult, AdmissionTokenRepository, GuestRepository,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::OrganizerAuth;
use domain::models::AdmissionToken;

/// Request body for token generation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerateTokenRequest {
    pub guest_id: Uuid,
}

/// Create or regenerate a guest's admission token.
///
/// POST /api/v1/qr-codes/generate
///
/// Regeneration is refused once the existing token is consumed: a used
/// credential stays on record and a new one would re-open a closed door.
pub async fn generate(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
    Json(request): Json<GenerateTokenRequest>,
) -> Result<(StatusCode, Json<AdmissionToken>), ApiError> {
    let guest_repo = GuestRepository::new(state.pool.clone());
    guest_repo
        .find_for_organizer(request.guest_id, auth.organizer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Guest not found".to_string()))?;

    let token_repo = AdmissionTokenRepository::new(state.pool.clone());
    match token_repo.regenerate_for_guest(request.guest_id).await? {
        RegenerateResult::Regenerated(token) => {
            info!(
                guest_id = %request.guest_id,
                token_id = %token.id,
                "Admission token issued"
            );
            Ok((StatusCode::CREATED, Json(token)))
        }
        RegenerateResult::AlreadyUsed => Err(ApiError::Conflict(
            "QR code has already been used and cannot be regenerated".to_string(),
        )),
        RegenerateResult::GuestNotFound => {
            Err(ApiError::NotFound("Guest not found".to_string()))
        }
    }
}
