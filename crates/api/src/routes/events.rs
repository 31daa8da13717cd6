//! Event management endpoint handlers.
//!
//! Minimal organizer-scoped event CRUD; enough to provision an event, load
//! its guest list, and run check-in against it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use persistence::repositories::EventRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::OrganizerAuth;
use domain::models::{CreateEventRequest, Event};

/// Create a new event owned by the authenticated organizer.
///
/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    request.validate()?;

    let repo = EventRepository::new(state.pool.clone());
    let event = repo.create(auth.organizer_id, &request).await?;

    info!(
        event_id = %event.id,
        organizer_id = %auth.organizer_id,
        "Event created"
    );

    Ok((StatusCode::CREATED, Json(event)))
}

/// List the authenticated organizer's events.
///
/// GET /api/v1/events
pub async fn list_events(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let events = repo.list_for_organizer(auth.organizer_id).await?;
    Ok(Json(events))
}

/// Fetch a single event, scoped to the authenticated organizer.
///
/// GET /api/v1/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let event = repo
        .find_for_organizer(event_id, auth.organizer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;
    Ok(Json(event))
}
