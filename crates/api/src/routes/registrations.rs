//! Registration endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use domain::models::{RegistrationRequest, RegistrationResponse};
use domain::services;
use domain::DomainError;
use persistence::repositories::{EventRepository, PgRegistrationStore, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::middleware::record_registration;
use crate::response::ApiResponse;

/// Register a user for an event.
///
/// POST /api/events/register
///
/// Existence of the user, then the event, is checked up front so the common
/// not-found cases never open a transaction. The transaction re-checks both
/// under lock.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegistrationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegistrationResponse>>), ApiError> {
    let (event_id, user_id) = request.ids()?;

    if UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .is_none()
    {
        return Err(DomainError::UserNotFound.into());
    }
    if EventRepository::new(state.pool.clone())
        .find_by_id(event_id)
        .await?
        .is_none()
    {
        return Err(DomainError::EventNotFound.into());
    }

    let store = PgRegistrationStore::new(state.pool.clone());
    let result = services::register(&store, event_id, user_id, Utc::now).await;
    record_registration(&result);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Successfully registered for the event",
            result?.into(),
        )),
    ))
}

/// Cancel a user's registration.
///
/// POST /api/events/cancel-registration
pub async fn cancel_registration(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegistrationRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let (event_id, user_id) = request.ids()?;

    let store = PgRegistrationStore::new(state.pool.clone());
    services::cancel(&store, event_id, user_id).await?;

    Ok(Json(ApiResponse::message(
        "Registration cancelled successfully",
    )))
}
