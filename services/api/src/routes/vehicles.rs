//! Vehicle endpoints: reads for any authenticated user, writes for ADMIN

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{ApiResponse, CreateVehicleRequest, UpdateVehicleRequest},
    state::AppState,
};

/// List all vehicles
pub async fn list_vehicles(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let vehicles = state.vehicle_repository.list().await?;
    Ok(Json(ApiResponse::ok(
        "Vehicles fetched successfully",
        vehicles,
    )))
}

/// Get a vehicle by ID
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicle = state
        .vehicle_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    Ok(Json(ApiResponse::ok("Vehicle fetched successfully", vehicle)))
}

/// Create a new vehicle
pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(payload): Json<CreateVehicleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.name.is_empty() {
        return Err(ApiError::Validation("Vehicle name is required".to_string()));
    }

    let vehicle = state.vehicle_repository.create(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Vehicle created successfully", vehicle)),
    ))
}

/// Apply a partial update to a vehicle
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVehicleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicle = state
        .vehicle_repository
        .update(id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    Ok(Json(ApiResponse::ok("Vehicle updated successfully", vehicle)))
}

/// Delete a vehicle
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.vehicle_repository.delete(id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Vehicle not found".to_string()));
    }

    Ok(Json(ApiResponse::message("Vehicle deleted successfully")))
}
