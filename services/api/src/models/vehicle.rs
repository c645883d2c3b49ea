//! Vehicle model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Operational status of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "vehicle_status", rename_all = "UPPERCASE")]
pub enum VehicleStatus {
    Active,
    Inactive,
    Maintenance,
}

/// Vehicle entity: the latest known state of a tracked vehicle
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub status: VehicleStatus,
    pub fuel_level: f64,
    pub odometer: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for vehicle creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVehicleRequest {
    pub name: String,
    pub status: Option<VehicleStatus>,
    pub fuel_level: Option<f64>,
    pub odometer: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed: Option<f64>,
}

/// Request for a partial vehicle update
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateVehicleRequest {
    pub name: Option<String>,
    pub status: Option<VehicleStatus>,
    pub fuel_level: Option<f64>,
    pub odometer: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&VehicleStatus::Maintenance).unwrap(),
            "\"MAINTENANCE\""
        );
        assert_eq!(
            serde_json::from_str::<VehicleStatus>("\"ACTIVE\"").unwrap(),
            VehicleStatus::Active
        );
    }
}
