//! JWT service for token generation and validation
//!
//! Issues and verifies signed, expiring tokens in two independent signing
//! domains: short-lived access tokens and long-lived refresh tokens, each
//! with its own HS256 secret. A token from one domain never verifies in the
//! other.

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::models::{Role, User};

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// User email
    pub email: String,
    /// User role
    pub role: Role,
    /// Token ID; makes every issued token textually unique, so rotation
    /// invalidates the previous token even within the same second
    pub jti: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Verification failure, distinguishing an outdated token from a forged or
/// malformed one since callers report different messages for each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
    access_token_expiry: u64,
    refresh_token_expiry: u64,
}

impl JwtService {
    /// Initialize a new JWT service from the authentication configuration
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        // Exact expiry boundary; jsonwebtoken defaults to 60s of leeway
        validation.leeway = 0;

        JwtService {
            access_encoding: EncodingKey::from_secret(config.access_token_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            validation,
            access_token_expiry: config.access_token_expiry,
            refresh_token_expiry: config.refresh_token_expiry,
        }
    }

    /// Generate a short-lived access token for a user
    pub fn issue_access(&self, user: &User) -> Result<String> {
        self.issue(user, self.access_token_expiry, &self.access_encoding)
    }

    /// Generate a long-lived refresh token for a user
    pub fn issue_refresh(&self, user: &User) -> Result<String> {
        self.issue(user, self.refresh_token_expiry, &self.refresh_encoding)
    }

    /// Validate a token against the access-token signing domain
    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, &self.access_decoding)
    }

    /// Validate a token against the refresh-token signing domain
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, &self.refresh_decoding)
    }

    /// Get the access token expiry time in seconds
    pub fn access_token_expiry(&self) -> u64 {
        self.access_token_expiry
    }

    /// Get the refresh token expiry time in seconds
    pub fn refresh_token_expiry(&self) -> u64 {
        self.refresh_token_expiry
    }

    fn issue(&self, user: &User, expiry: u64, key: &EncodingKey) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            jti: Uuid::new_v4(),
            iat: now,
            exp: now + expiry,
        };

        let token = encode(&Header::default(), &claims, key)?;
        Ok(token)
    }

    fn verify(&self, token: &str, key: &DecodingKey) -> Result<Claims, TokenError> {
        decode::<Claims>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_config() -> AuthConfig {
        AuthConfig {
            access_token_secret: "access-secret-for-tests".to_string(),
            refresh_token_secret: "refresh-secret-for-tests".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
            cookie_secure: false,
        }
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            name: Some("Alice".to_string()),
            password_hash: "hash".to_string(),
            role: Role::Admin,
            is_active: true,
            refresh_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = JwtService::new(&test_config());
        let user = test_user();

        let token = service.issue_access(&user).expect("token should issue");
        let claims = service.verify_access(&token).expect("token should verify");

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, user.role);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_domains_are_independent() {
        let service = JwtService::new(&test_config());
        let user = test_user();

        let refresh = service.issue_refresh(&user).expect("token should issue");
        assert_eq!(service.verify_access(&refresh), Err(TokenError::Invalid));

        let access = service.issue_access(&user).expect("token should issue");
        assert_eq!(service.verify_refresh(&access), Err(TokenError::Invalid));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let service = JwtService::new(&test_config());
        let token = service
            .issue_access(&test_user())
            .expect("token should issue");

        let mut tampered = token;
        tampered.push('x');
        assert_eq!(service.verify_access(&tampered), Err(TokenError::Invalid));

        assert_eq!(service.verify_access("not-a-jwt"), Err(TokenError::Invalid));
    }

    #[test]
    fn test_expired_is_distinct_from_invalid() {
        let config = test_config();
        let service = JwtService::new(&config);
        let user = test_user();

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            jti: Uuid::new_v4(),
            iat: now - 120,
            exp: now - 60,
        };
        let expired = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.access_token_secret.as_bytes()),
        )
        .expect("token should encode");

        assert_eq!(service.verify_access(&expired), Err(TokenError::Expired));
    }
}
