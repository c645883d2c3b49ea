//! API models: entities, request payloads, and the response envelope

pub mod user;
pub mod vehicle;

use serde::Serialize;

// Re-export for convenience
pub use user::{
    AccessTokenResponse, AuthResponse, LoginRequest, NewUser, RegisterRequest, Role,
    UpdateUserRequest, User, UserChanges, UserResponse,
};
pub use vehicle::{CreateVehicleRequest, UpdateVehicleRequest, Vehicle, VehicleStatus};

/// Response envelope shared by every endpoint:
/// `{success, message, data?, error?}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying a payload
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Successful response with no payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
        }
    }
}
