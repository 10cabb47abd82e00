//! Authentication middleware for protected routes
//!
//! Extracts the bearer token from the Authorization header, verifies it
//! against the signing key held in application state, and puts an
//! [`AuthenticatedUser`] into request extensions for the handlers.

use super::jwt;
use super::policy::Role;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use thiserror::Error;

/// The caller as established by the middleware
///
/// Handlers extract this with `Extension<AuthenticatedUser>`. The role is
/// `None` when the token carried no role claim or an unknown role name.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Account name from the token subject
    pub subject: String,
    /// Parsed role claim
    pub role: Option<Role>,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}

/// Authentication and authorization failures
///
/// Everything wrong with the token itself is a 401 with one
/// indistinguishable message; only an insufficient role is a 403.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Insufficient role")]
    InsufficientRole,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AuthError::MissingAuthHeader | AuthError::InvalidAuthHeader | AuthError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, ApiError::unauthorized())
            }
            AuthError::InsufficientRole => (StatusCode::FORBIDDEN, ApiError::forbidden()),
        };

        (status, Json(error)).into_response()
    }
}

/// Middleware requiring a valid bearer token
///
/// 1. Extracts the Authorization header
/// 2. Validates the `Bearer ` format
/// 3. Verifies signature and expiry
/// 4. Adds `AuthenticatedUser` to request extensions
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?;

    if !jwt::verify(&state.jwt, token) {
        tracing::debug!("rejected bearer token");
        return Err(AuthError::InvalidToken);
    }

    // Claims decode after a successful verify; a failure here still means
    // the caller is unauthenticated, never a server fault.
    let subject = jwt::decode_subject(&state.jwt, token).map_err(|_| AuthError::InvalidToken)?;
    let role = jwt::decode_role(&state.jwt, token)
        .map_err(|_| AuthError::InvalidToken)?
        .as_deref()
        .and_then(Role::parse);

    request
        .extensions_mut()
        .insert(AuthenticatedUser { subject, role });

    Ok(next.run(request).await)
}
