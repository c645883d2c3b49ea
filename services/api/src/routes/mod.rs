//! HTTP routes for the Vehicle Tracker API

pub mod auth;
pub mod users;
pub mod vehicles;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::{
    middleware::{auth_middleware, require_admin},
    state::AppState,
};

/// Create the router for the Vehicle Tracker API
pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .merge(
            Router::new()
                .route("/me", get(auth::me))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    // Whole surface is ADMIN-only
    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Reads for any authenticated user, mutations for ADMIN
    let vehicle_routes = Router::new()
        .route("/", get(vehicles::list_vehicles))
        .route("/:id", get(vehicles::get_vehicle))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .merge(
            Router::new()
                .route("/", post(vehicles::create_vehicle))
                .route(
                    "/:id",
                    axum::routing::put(vehicles::update_vehicle)
                        .delete(vehicles::delete_vehicle),
                )
                .route_layer(middleware::from_fn(require_admin))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/vehicles", vehicle_routes)
        .fallback(not_found)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Vehicle Tracker API is running"
    }))
}

/// Enveloped 404 for unknown routes
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Route not found"
        })),
    )
}
