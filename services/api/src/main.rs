use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod config;
mod error;
mod jwt;
mod middleware;
mod models;
mod password;
mod repositories;
mod routes;
mod session;
mod state;
mod validation;

use common::database;
use common::error::DatabaseError;

use crate::{
    config::AuthConfig,
    jwt::JwtService,
    repositories::{UserRepository, VehicleRepository},
    session::SessionService,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting Vehicle Tracker API");

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;

    // Authentication configuration is built once here and injected; missing
    // signing secrets abort startup
    let auth_config = AuthConfig::from_env()?;
    let jwt_service = JwtService::new(&auth_config);

    let user_repository = UserRepository::new(pool.clone());
    let vehicle_repository = VehicleRepository::new(pool.clone());
    let session_service = SessionService::new(user_repository.clone(), jwt_service.clone());

    let app_state = AppState {
        db_pool: pool,
        auth_config,
        jwt_service,
        session_service,
        user_repository,
        vehicle_repository,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Vehicle Tracker API listening on 0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
