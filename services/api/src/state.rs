//! Application state shared across handlers

use sqlx::PgPool;

use crate::{
    config::AuthConfig,
    jwt::JwtService,
    repositories::{UserRepository, VehicleRepository},
    session::SessionService,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_config: AuthConfig,
    pub jwt_service: JwtService,
    pub session_service: SessionService,
    pub user_repository: UserRepository,
    pub vehicle_repository: VehicleRepository,
}
