//! Vehicle repository for database operations

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::{CreateVehicleRequest, UpdateVehicleRequest, Vehicle, VehicleStatus};

const VEHICLE_COLUMNS: &str =
    "id, name, status, fuel_level, odometer, latitude, longitude, speed, created_at, updated_at";

/// Vehicle repository
#[derive(Clone)]
pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    /// Create a new vehicle repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all vehicles, newest first
    pub async fn list(&self) -> Result<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    /// Find a vehicle by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Create a new vehicle
    pub async fn create(&self, payload: &CreateVehicleRequest) -> Result<Vehicle> {
        info!("Creating vehicle: {}", payload.name);

        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            INSERT INTO vehicles (name, status, fuel_level, odometer, latitude, longitude, speed)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {VEHICLE_COLUMNS}
            "#
        ))
        .bind(&payload.name)
        .bind(payload.status.unwrap_or(VehicleStatus::Active))
        .bind(payload.fuel_level.unwrap_or(0.0))
        .bind(payload.odometer.unwrap_or(0.0))
        .bind(payload.latitude.unwrap_or(0.0))
        .bind(payload.longitude.unwrap_or(0.0))
        .bind(payload.speed.unwrap_or(0.0))
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Apply a partial update; returns the updated vehicle, or None if absent
    pub async fn update(&self, id: Uuid, changes: &UpdateVehicleRequest) -> Result<Option<Vehicle>> {
        info!("Updating vehicle: {}", id);

        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            UPDATE vehicles SET
                name = COALESCE($2, name),
                status = COALESCE($3, status),
                fuel_level = COALESCE($4, fuel_level),
                odometer = COALESCE($5, odometer),
                latitude = COALESCE($6, latitude),
                longitude = COALESCE($7, longitude),
                speed = COALESCE($8, speed),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {VEHICLE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(changes.status)
        .bind(changes.fuel_level)
        .bind(changes.odometer)
        .bind(changes.latitude)
        .bind(changes.longitude)
        .bind(changes.speed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Delete a vehicle; returns whether a row was removed
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting vehicle: {}", id);

        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
