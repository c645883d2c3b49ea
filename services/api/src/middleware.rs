//! Authorization middleware: access-token validation and role checks

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{error::ApiError, jwt::TokenError, models::Role, state::AppState};

/// Authenticated identity attached to the request after token validation
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Extract and validate the access token from the Authorization header
///
/// Every access-token problem is a 401, consistently: it is the credential
/// the client proactively refreshes on.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Access token is required".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Access token is required".to_string()))?;

    let claims = state.jwt_service.verify_access(token).map_err(|e| match e {
        TokenError::Expired => ApiError::Unauthorized("Access token expired".to_string()),
        TokenError::Invalid => ApiError::Unauthorized("Invalid access token".to_string()),
    })?;

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

/// Role-membership predicate for an already-verified identity
pub fn check_role(user: Option<&AuthUser>, allowed: &[Role]) -> Result<(), ApiError> {
    let user = user.ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Admin only".to_string()))
    }
}

/// Gate a route on the ADMIN role; `auth_middleware` must run first
pub async fn require_admin(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    check_role(req.extensions().get::<AuthUser>(), &[Role::Admin])?;
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_check_role_accepts_member() {
        let admin = identity(Role::Admin);
        assert!(check_role(Some(&admin), &[Role::Admin]).is_ok());

        let user = identity(Role::User);
        assert!(check_role(Some(&user), &[Role::User, Role::Admin]).is_ok());
    }

    #[test]
    fn test_check_role_rejects_non_member_with_forbidden() {
        let user = identity(Role::User);
        assert!(matches!(
            check_role(Some(&user), &[Role::Admin]),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn test_check_role_without_identity_is_unauthorized() {
        assert!(matches!(
            check_role(None, &[Role::Admin]),
            Err(ApiError::Unauthorized(_))
        ));
    }
}
