//! User endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{User, UserPayload, UserResponse};
use domain::DomainError;
use persistence::repositories::UserRepository;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiPath};
use crate::response::ApiResponse;

/// Unique violations on users can only come from the email constraint.
fn email_conflict(err: sqlx::Error) -> ApiError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => DomainError::DuplicateEmail.into(),
        _ => err.into(),
    }
}

fn to_response(entity: persistence::entities::UserEntity) -> UserResponse {
    User::from(entity).into()
}

/// Create a user.
///
/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UserPayload>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    let new_user = payload.into_new_user()?;

    let user = UserRepository::new(state.pool.clone())
        .create(&new_user)
        .await
        .map_err(email_conflict)?;

    info!(user_id = %user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "User created successfully",
            to_response(user),
        )),
    ))
}

/// List all users in creation order.
///
/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    let users = UserRepository::new(state.pool.clone()).find_all().await?;

    Ok(Json(ApiResponse::list(
        users.into_iter().map(to_response).collect(),
    )))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .ok_or(DomainError::UserNotFound)?;

    Ok(Json(ApiResponse::data(to_response(user))))
}

/// Replace a user's name and email.
///
/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UserPayload>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let new_user = payload.into_new_user()?;

    let user = UserRepository::new(state.pool.clone())
        .update(user_id, &new_user)
        .await
        .map_err(email_conflict)?
        .ok_or(DomainError::UserNotFound)?;

    info!(user_id = %user.id, "User updated");

    Ok(Json(ApiResponse::with_message(
        "User updated successfully",
        to_response(user),
    )))
}

/// Delete a user and, by cascade, their registrations.
///
/// DELETE /api/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !UserRepository::new(state.pool.clone()).delete(user_id).await? {
        return Err(DomainError::UserNotFound.into());
    }

    info!(user_id = %user_id, "User deleted");

    Ok(Json(ApiResponse::message("User deleted successfully")))
}
