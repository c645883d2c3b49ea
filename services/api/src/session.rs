//! Session lifecycle: registration, login, token refresh, and logout
//!
//! Owns the invariant that at most one valid refresh token exists per user:
//! register, login, and refresh overwrite the stored token, logout clears
//! it. An overwritten token stops matching the stored value and is rejected
//! on its next use, which is what makes rotation effective.

use tracing::info;
use uuid::Uuid;

use crate::{
    error::ApiError,
    jwt::{JwtService, TokenError},
    models::{LoginRequest, NewUser, RegisterRequest, Role, User, UserResponse},
    password,
    repositories::UserRepository,
    validation,
};

/// Token pair produced when a session is opened
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Session service orchestrating the authentication lifecycle
#[derive(Clone)]
pub struct SessionService {
    users: UserRepository,
    jwt: JwtService,
}

impl SessionService {
    /// Create a new session service
    pub fn new(users: UserRepository, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    /// Register a new user and open a session for them
    pub async fn register(
        &self,
        payload: RegisterRequest,
    ) -> Result<(UserResponse, IssuedTokens), ApiError> {
        let user = self.create_user_record(payload).await?;
        let tokens = self.open_session(&user).await?;

        info!("Registered user: {}", user.id);
        Ok((user.into(), tokens))
    }

    /// Create a user without opening a session (admin user creation)
    pub async fn create_user(&self, payload: RegisterRequest) -> Result<UserResponse, ApiError> {
        let user = self.create_user_record(payload).await?;
        Ok(user.into())
    }

    /// Authenticate a user and open a session.
    ///
    /// Unknown email and wrong password are reported identically so the
    /// response never reveals which one occurred.
    pub async fn login(
        &self,
        payload: LoginRequest,
    ) -> Result<(UserResponse, IssuedTokens), ApiError> {
        let (email, password) = require_credentials(payload.email, payload.password)?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

        if !user.is_active {
            return Err(ApiError::Forbidden("Account is deactivated".to_string()));
        }

        if !password::verify_password(&password, &user.password_hash)? {
            return Err(ApiError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        let tokens = self.open_session(&user).await?;

        info!("User logged in: {}", user.id);
        Ok((user.into(), tokens))
    }

    /// Exchange a refresh token for a new access token, rotating the refresh
    /// token in the process.
    ///
    /// The presented token must textually match the one stored on the user
    /// record; a superseded token is rejected even if its signature and
    /// expiry are still valid.
    pub async fn refresh(&self, presented: &str) -> Result<IssuedTokens, ApiError> {
        let claims = self.jwt.verify_refresh(presented).map_err(|e| match e {
            TokenError::Expired => ApiError::Unauthorized("Refresh token expired".to_string()),
            TokenError::Invalid => ApiError::Forbidden("Invalid refresh token".to_string()),
        })?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .filter(|user| user.refresh_token.as_deref() == Some(presented))
            .ok_or_else(|| ApiError::Forbidden("Invalid refresh token".to_string()))?;

        if !user.is_active {
            return Err(ApiError::Forbidden("Account is deactivated".to_string()));
        }

        let tokens = self.open_session(&user).await?;
        Ok(tokens)
    }

    /// Close the session matching the presented refresh token.
    ///
    /// Idempotent: reports success whether or not anything matched, so the
    /// response never reveals whether a token was valid.
    pub async fn logout(&self, presented: Option<&str>) -> Result<(), ApiError> {
        if let Some(token) = presented {
            let cleared = self.users.clear_refresh_token(token).await?;
            info!("Logout cleared {} session(s)", cleared);
        }

        Ok(())
    }

    /// Public projection of the user behind a verified access token
    pub async fn current_user(&self, id: Uuid) -> Result<UserResponse, ApiError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    async fn create_user_record(&self, payload: RegisterRequest) -> Result<User, ApiError> {
        let (email, password) = require_credentials(payload.email, payload.password)?;
        validation::validate_email(&email).map_err(ApiError::Validation)?;
        validation::validate_password(&password).map_err(ApiError::Validation)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = password::hash_password(&password)?;
        let user = self
            .users
            .create(&NewUser {
                email,
                name: payload.name,
                password_hash,
                role: payload.role.unwrap_or(Role::User),
            })
            .await?;

        Ok(user)
    }

    /// Issue a token pair and persist the refresh token on the user record
    async fn open_session(&self, user: &User) -> Result<IssuedTokens, ApiError> {
        let access_token = self.jwt.issue_access(user)?;
        let refresh_token = self.jwt.issue_refresh(user)?;

        self.users
            .store_refresh_token(user.id, Some(&refresh_token))
            .await?;

        Ok(IssuedTokens {
            access_token,
            refresh_token,
        })
    }
}

fn require_credentials(
    email: Option<String>,
    password: Option<String>,
) -> Result<(String, String), ApiError> {
    match (email, password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            Ok((email, password))
        }
        _ => Err(ApiError::Validation(
            "Email and password are required".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use common::database::{DatabaseConfig, init_pool};

    fn test_config() -> AuthConfig {
        AuthConfig {
            access_token_secret: "access-secret-for-tests".to_string(),
            refresh_token_secret: "refresh-secret-for-tests".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
            cookie_secure: false,
        }
    }

    fn register_payload(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: Some(email.to_string()),
            password: Some("Passw0rd!".to_string()),
            name: Some("Alice".to_string()),
            role: None,
        }
    }

    #[test]
    fn test_missing_credentials_are_a_validation_error() {
        assert!(matches!(
            require_credentials(None, Some("Passw0rd!".to_string())),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            require_credentials(Some("alice@example.com".to_string()), None),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            require_credentials(Some(String::new()), Some(String::new())),
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
    async fn test_session_lifecycle() -> anyhow::Result<()> {
        let pool = init_pool(&DatabaseConfig::from_env()?).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        let service = SessionService::new(
            UserRepository::new(pool.clone()),
            JwtService::new(&test_config()),
        );

        let email = format!("alice-{}@example.com", Uuid::new_v4());

        // Register opens a session
        let (user, first) = service.register(register_payload(&email)).await?;
        assert_eq!(user.email, email);
        assert_eq!(user.role, Role::User);
        assert!(!first.access_token.is_empty());

        // Registering the same email again conflicts
        assert!(matches!(
            service.register(register_payload(&email)).await,
            Err(ApiError::Conflict(_))
        ));

        // Login with the registered pair succeeds
        let (_, session) = service
            .login(LoginRequest {
                email: Some(email.clone()),
                password: Some("Passw0rd!".to_string()),
            })
            .await?;

        // Login superseded the register-issued refresh token
        assert!(matches!(
            service.refresh(&first.refresh_token).await,
            Err(ApiError::Forbidden(_))
        ));

        // Refresh rotates: the pre-rotation token stops working
        let rotated = service.refresh(&session.refresh_token).await?;
        assert!(matches!(
            service.refresh(&session.refresh_token).await,
            Err(ApiError::Forbidden(_))
        ));

        // Logout closes the session; the just-cleared token is rejected
        service.logout(Some(&rotated.refresh_token)).await?;
        assert!(matches!(
            service.refresh(&rotated.refresh_token).await,
            Err(ApiError::Forbidden(_))
        ));

        // Logout without a token still succeeds
        service.logout(None).await?;

        // Wrong password and unknown email report identically
        let wrong = service
            .login(LoginRequest {
                email: Some(email.clone()),
                password: Some("WrongPass1!".to_string()),
            })
            .await;
        let unknown = service
            .login(LoginRequest {
                email: Some(format!("nobody-{}@example.com", Uuid::new_v4())),
                password: Some("Passw0rd!".to_string()),
            })
            .await;
        match (wrong, unknown) {
            (Err(ApiError::Unauthorized(a)), Err(ApiError::Unauthorized(b))) => assert_eq!(a, b),
            other => panic!("expected identical unauthorized errors, got {:?}", other.0),
        }

        // Deactivation forbids login even with correct credentials
        let users = UserRepository::new(pool.clone());
        users
            .update(
                user.id,
                &crate::models::UserChanges {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await?;
        assert!(matches!(
            service
                .login(LoginRequest {
                    email: Some(email.clone()),
                    password: Some("Passw0rd!".to_string()),
                })
                .await,
            Err(ApiError::Forbidden(_))
        ));

        Ok(())
    }
}
