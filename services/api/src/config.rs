//! Authentication configuration
//!
//! Built once at process start and passed into the token codec and session
//! service by dependency injection; the signing secrets are never read from
//! the environment anywhere else.

use anyhow::Result;
use std::env;

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret for the access-token signing domain
    pub access_token_secret: String,
    /// Secret for the refresh-token signing domain
    pub refresh_token_secret: String,
    /// Access token expiration time in seconds (default: 15 minutes)
    pub access_token_expiry: u64,
    /// Refresh token expiration time in seconds (default: 7 days)
    pub refresh_token_expiry: u64,
    /// Whether the refresh cookie is marked Secure (on outside development)
    pub cookie_secure: bool,
}

impl AuthConfig {
    /// Create a new AuthConfig from environment variables
    ///
    /// # Environment Variables
    /// - `ACCESS_TOKEN_SECRET`: signing secret for access tokens (required)
    /// - `REFRESH_TOKEN_SECRET`: signing secret for refresh tokens (required)
    /// - `ACCESS_TOKEN_EXPIRY`: access token expiry in seconds (default: 900)
    /// - `REFRESH_TOKEN_EXPIRY`: refresh token expiry in seconds (default: 604800)
    /// - `APP_ENV`: "production" marks the refresh cookie Secure
    pub fn from_env() -> Result<Self> {
        let access_token_secret = env::var("ACCESS_TOKEN_SECRET")
            .map_err(|_| anyhow::anyhow!("ACCESS_TOKEN_SECRET environment variable not set"))?;

        let refresh_token_secret = env::var("REFRESH_TOKEN_SECRET")
            .map_err(|_| anyhow::anyhow!("REFRESH_TOKEN_SECRET environment variable not set"))?;

        let access_token_expiry = env::var("ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "900".to_string()) // 15 minutes
            .parse()
            .unwrap_or(900);

        let refresh_token_expiry = env::var("REFRESH_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "604800".to_string()) // 7 days
            .parse()
            .unwrap_or(604800);

        let cookie_secure = env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        Ok(AuthConfig {
            access_token_secret,
            refresh_token_secret,
            access_token_expiry,
            refresh_token_expiry,
            cookie_secure,
        })
    }
}
