//! Guest management endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use persistence::repositories::{EventRepository, GuestRepository};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::OrganizerAuth;
use domain::models::{AdmissionToken, CreateGuestRequest, Guest};

/// A freshly registered guest together with their admission token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateGuestResponse {
    pub guest: Guest,
    pub qr_code: AdmissionToken,
}

/// Register a guest for an event. The guest's admission token is provisioned
/// in the same transaction and returned alongside.
///
/// POST /api/v1/events/:event_id/guests
pub async fn create_guest(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<CreateGuestRequest>,
) -> Result<(StatusCode, Json<CreateGuestResponse>), ApiError> {
    request.validate()?;

    let event_repo = EventRepository::new(state.pool.clone());
    event_repo
        .find_for_organizer(event_id, auth.organizer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    let guest_repo = GuestRepository::new(state.pool.clone());
    let (guest, token) = guest_repo.create(event_id, &request).await?;

    info!(
        guest_id = %guest.id,
        event_id = %event_id,
        "Guest registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateGuestResponse {
            guest,
            qr_code: token,
        }),
    ))
}

/// List guests registered for an event.
///
/// GET /api/v1/events/:event_id/guests
pub async fn list_guests(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<Guest>>, ApiError> {
    let event_repo = EventRepository::new(state.pool.clone());
    event_repo
        .find_for_organizer(event_id, auth.organizer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    let guest_repo = GuestRepository::new(state.pool.clone());
    let guests = guest_repo.list_for_event(event_id).await?;
    Ok(Json(guests))
}
