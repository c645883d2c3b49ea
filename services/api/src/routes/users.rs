//! User administration endpoints (ADMIN only)

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{ApiResponse, RegisterRequest, UpdateUserRequest, UserChanges, UserResponse},
    password,
    state::AppState,
};

/// List all users
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.user_repository.list().await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(ApiResponse::ok("Users fetched successfully", users)))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiResponse::ok(
        "User fetched successfully",
        UserResponse::from(user),
    )))
}

/// Create a user without opening a session for them
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.session_service.create_user(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("User created successfully", user)),
    ))
}

/// Apply a partial update to a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(email) = &payload.email {
        crate::validation::validate_email(email).map_err(ApiError::Validation)?;
    }

    let password_hash = match &payload.password {
        Some(new_password) => {
            crate::validation::validate_password(new_password).map_err(ApiError::Validation)?;
            Some(password::hash_password(new_password)?)
        }
        None => None,
    };

    let changes = UserChanges {
        email: payload.email,
        name: payload.name,
        password_hash,
        role: payload.role,
        is_active: payload.is_active,
    };

    let user = state
        .user_repository
        .update(id, &changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiResponse::ok(
        "User updated successfully",
        UserResponse::from(user),
    )))
}

/// Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.user_repository.delete(id).await?;

    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(ApiResponse::message("User deleted successfully")))
}
