//! Request pipeline tests against an in-process mock server
//!
//! Exercises the 401 → refresh → replay contract: the replay happens exactly
//! once, login/register are never silently retried, and a failed refresh
//! forces a client-side logout.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use client::models::LoginRequest;
use client::{ApiClient, ClientError, MemoryStorage, SessionStore};

const FRESH_TOKEN: &str = "fresh-access-token";

#[derive(Default)]
struct MockState {
    vehicle_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    login_calls: AtomicUsize,
    /// When false the refresh endpoint answers 401
    refresh_succeeds: bool,
    /// When true the vehicles endpoint answers 401 regardless of the token
    vehicles_always_401: bool,
}

fn user_json() -> serde_json::Value {
    json!({
        "id": "7f2c1c84-66a5-4b3e-9c6c-6a1f5dd0a001",
        "email": "alice@example.com",
        "name": "Alice",
        "role": "USER",
        "is_active": true,
        "created_at": "2026-08-01T10:00:00Z",
        "updated_at": "2026-08-01T10:00:00Z"
    })
}

async fn vehicles_handler(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    state.vehicle_calls.fetch_add(1, Ordering::SeqCst);

    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if state.vehicles_always_401 || bearer != format!("Bearer {FRESH_TOKEN}") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Access token expired"})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Vehicles fetched successfully",
            "data": []
        })),
    )
}

async fn refresh_handler(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    if state.refresh_succeeds {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Access token refreshed",
                "data": {"accessToken": FRESH_TOKEN}
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Refresh token expired"})),
        )
    }
}

async fn login_handler(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    state.login_calls.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"success": false, "message": "Invalid email or password"})),
    )
}

async fn login_ok_handler() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Login successful",
        "data": {"user": user_json(), "accessToken": FRESH_TOKEN}
    }))
}

async fn spawn_server(state: Arc<MockState>, login_succeeds: bool) -> String {
    let login = if login_succeeds {
        post(login_ok_handler)
    } else {
        post(login_handler)
    };

    let app = Router::new()
        .route("/api/vehicles", get(vehicles_handler))
        .route("/api/auth/refresh", post(refresh_handler))
        .route("/api/auth/login", login)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the acceptor a moment to come up
    tokio::time::sleep(Duration::from_millis(20)).await;
    format!("http://{addr}")
}

fn stale_client(base_url: &str) -> ApiClient {
    let store = Arc::new(SessionStore::new(Arc::new(MemoryStorage::default())));
    store.set_access_token("stale-access-token".to_string());
    ApiClient::new(base_url, store).unwrap()
}

#[tokio::test]
async fn test_401_refreshes_and_replays_exactly_once() {
    let state = Arc::new(MockState {
        refresh_succeeds: true,
        ..MockState::default()
    });
    let base_url = spawn_server(state.clone(), true).await;
    let api = stale_client(&base_url);

    let vehicles = api.vehicles().await.expect("replay should succeed");
    assert!(vehicles.is_empty());

    assert_eq!(state.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.vehicle_calls.load(Ordering::SeqCst), 2);
    assert_eq!(api.store().access_token().as_deref(), Some(FRESH_TOKEN));
}

#[tokio::test]
async fn test_replay_is_one_shot_even_if_it_fails_again() {
    let state = Arc::new(MockState {
        refresh_succeeds: true,
        vehicles_always_401: true,
        ..MockState::default()
    });
    let base_url = spawn_server(state.clone(), true).await;
    let api = stale_client(&base_url);

    let err = api.vehicles().await.expect_err("should surface the 401");
    assert!(matches!(err, ClientError::Api { status: 401, .. }));

    // One refresh, one replay, no loop
    assert_eq!(state.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.vehicle_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failed_refresh_forces_logout() {
    let state = Arc::new(MockState {
        refresh_succeeds: false,
        ..MockState::default()
    });
    let base_url = spawn_server(state.clone(), true).await;
    let api = stale_client(&base_url);

    let err = api.vehicles().await.expect_err("refresh failure surfaces");
    assert!(matches!(err, ClientError::Api { status: 401, .. }));

    assert_eq!(state.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.vehicle_calls.load(Ordering::SeqCst), 1);
    assert!(!api.store().is_authenticated());
    assert_eq!(api.store().access_token(), None);
}

#[tokio::test]
async fn test_login_rejection_is_not_silently_retried() {
    let state = Arc::new(MockState::default());
    let base_url = spawn_server(state.clone(), false).await;
    let store = Arc::new(SessionStore::new(Arc::new(MemoryStorage::default())));
    let api = ApiClient::new(&base_url, store).unwrap();

    let err = api
        .login(&LoginRequest {
            email: "alice@example.com".to_string(),
            password: "WrongPass1!".to_string(),
        })
        .await
        .expect_err("login should fail");
    assert!(matches!(err, ClientError::Api { status: 401, .. }));

    assert_eq!(state.login_calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.refresh_calls.load(Ordering::SeqCst), 0);
    assert!(!api.store().is_authenticated());
}

#[tokio::test]
async fn test_login_success_stores_session_and_authorizes_requests() {
    let state = Arc::new(MockState {
        refresh_succeeds: true,
        ..MockState::default()
    });
    let base_url = spawn_server(state.clone(), true).await;
    let store = Arc::new(SessionStore::new(Arc::new(MemoryStorage::default())));
    let api = ApiClient::new(&base_url, store).unwrap();

    let auth = api
        .login(&LoginRequest {
            email: "alice@example.com".to_string(),
            password: "Passw0rd!".to_string(),
        })
        .await
        .expect("login should succeed");
    assert_eq!(auth.user.email, "alice@example.com");
    assert!(api.store().is_authenticated());

    // The stored token authorizes the next request with no refresh needed
    let vehicles = api.vehicles().await.expect("vehicles should succeed");
    assert!(vehicles.is_empty());
    assert_eq!(state.refresh_calls.load(Ordering::SeqCst), 0);
    assert_eq!(state.vehicle_calls.load(Ordering::SeqCst), 1);
}
