//! Authentication endpoints

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    error::ApiError,
    middleware::AuthUser,
    models::{AccessTokenResponse, ApiResponse, AuthResponse, LoginRequest, RegisterRequest},
    state::AppState,
};

/// Name of the HTTP-only cookie carrying the refresh token
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Build the refresh-token cookie: HTTP-only, SameSite=Strict, Secure
/// outside local development, max-age matching the token's validity
fn refresh_cookie(token: String, secure: bool, max_age_secs: u64) -> Cookie<'static> {
    let mut cookie = Cookie::new(REFRESH_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_secure(secure);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::seconds(max_age_secs as i64));
    cookie
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, tokens) = state.session_service.register(payload).await?;

    let jar = jar.add(refresh_cookie(
        tokens.refresh_token,
        state.auth_config.cookie_secure,
        state.auth_config.refresh_token_expiry,
    ));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(ApiResponse::ok(
            "User registered successfully",
            AuthResponse {
                user,
                access_token: tokens.access_token,
            },
        )),
    ))
}

/// Login an existing user
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, tokens) = state.session_service.login(payload).await?;

    let jar = jar.add(refresh_cookie(
        tokens.refresh_token,
        state.auth_config.cookie_secure,
        state.auth_config.refresh_token_expiry,
    ));

    Ok((
        jar,
        Json(ApiResponse::ok(
            "Login successful",
            AuthResponse {
                user,
                access_token: tokens.access_token,
            },
        )),
    ))
}

/// Exchange the refresh cookie for a new access token. The refresh token is
/// rotated, so the cookie is re-set alongside; the response body carries
/// only the access token.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let presented = jar
        .get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("Refresh token is required".to_string()))?;

    let tokens = state.session_service.refresh(&presented).await?;

    let jar = jar.add(refresh_cookie(
        tokens.refresh_token,
        state.auth_config.cookie_secure,
        state.auth_config.refresh_token_expiry,
    ));

    Ok((
        jar,
        Json(ApiResponse::ok(
            "Access token refreshed",
            AccessTokenResponse {
                access_token: tokens.access_token,
            },
        )),
    ))
}

/// Close the current session. Idempotent: succeeds with or without a cookie,
/// whether or not the token matched anything.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let presented = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());
    state.session_service.logout(presented.as_deref()).await?;

    let jar = jar.remove(Cookie::build(REFRESH_COOKIE).path("/"));

    Ok((jar, Json(ApiResponse::message("Logout successful"))))
}

/// Current user behind the verified access token
pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.session_service.current_user(auth_user.id).await?;
    Ok(Json(ApiResponse::ok("Current user fetched", user)))
}
