//! Event endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use domain::models::{
    Event, EventDetailsResponse, EventPayload, EventResponse, EventStats, RegisteredUser,
};
use domain::services;
use domain::DomainError;
use persistence::repositories::{EventRepository, PgRegistrationStore};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiPath};
use crate::response::ApiResponse;

/// Create an event.
///
/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<EventPayload>,
) -> Result<(StatusCode, Json<ApiResponse<EventResponse>>), ApiError> {
    let new_event = payload.into_new_event()?;

    let event = Event::from(
        EventRepository::new(state.pool.clone())
            .create(&new_event)
            .await?,
    );

    info!(
        event_id = %event.id,
        capacity = event.capacity,
        date_time = %event.date_time,
        "Event created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Event created successfully",
            event.into(),
        )),
    ))
}

/// List all events ordered by start time.
///
/// GET /api/events
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<EventResponse>>>, ApiError> {
    let events = EventRepository::new(state.pool.clone()).find_all().await?;

    Ok(Json(ApiResponse::list(
        events
            .into_iter()
            .map(|e| EventResponse::from(Event::from(e)))
            .collect(),
    )))
}

/// Events that have not started yet, by start time then location.
///
/// GET /api/events/upcoming
pub async fn upcoming_events(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<EventResponse>>>, ApiError> {
    let store = PgRegistrationStore::new(state.pool.clone());
    let events = services::upcoming_events(&store, Utc::now()).await?;

    Ok(Json(ApiResponse::list(
        events.into_iter().map(EventResponse::from).collect(),
    )))
}

/// Event details with its registered users in registration order.
///
/// GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<EventDetailsResponse>>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());

    let event = repo
        .find_by_id(event_id)
        .await?
        .ok_or(DomainError::EventNotFound)?;
    let users = repo.find_registered_users(event_id).await?;

    Ok(Json(ApiResponse::data(EventDetailsResponse::new(
        event.into(),
        users.into_iter().map(RegisteredUser::from).collect(),
    ))))
}

/// GET /api/events/:id/stats
pub async fn event_stats(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<EventStats>>, ApiError> {
    let store = PgRegistrationStore::new(state.pool.clone());
    let stats = services::event_stats(&store, event_id).await?;

    Ok(Json(ApiResponse::data(stats)))
}

/// Replace every field of an event.
///
/// PUT /api/events/:id
///
/// The new capacity may not be lower than the current registration count.
pub async fn update_event(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<EventPayload>,
) -> Result<Json<ApiResponse<EventResponse>>, ApiError> {
    let new_event = payload.into_new_event()?;

    let store = PgRegistrationStore::new(state.pool.clone());
    let event = services::replace_event(&store, event_id, &new_event).await?;

    Ok(Json(ApiResponse::with_message(
        "Event updated successfully",
        event.into(),
    )))
}

/// Delete an event and, by cascade, its registrations.
///
/// DELETE /api/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !EventRepository::new(state.pool.clone())
        .delete(event_id)
        .await?
    {
        return Err(DomainError::EventNotFound.into());
    }

    info!(event_id = %event_id, "Event deleted");

    Ok(Json(ApiResponse::message("Event deleted successfully")))
}
