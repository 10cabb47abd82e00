//! Account handlers: login, registration, listing

use crate::auth::policy::{self, Operation, Role};
use crate::auth::{
    AccountRequest, AccountResponse, AuthResponse, AuthService, AuthenticatedUser, LoginRequest,
};
use crate::error::AppError;
use crate::state::AppState;
use crate::store::AccountStore;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use std::sync::Arc;
use validator::Validate;

/// Login with account name and password
#[utoipa::path(
    post,
    path = "/api/accounts/login",
    tag = "accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid credentials", body = crate::error::ApiError),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let service = AuthService::new(state.db.clone(), state.jwt.clone());
    let response = service.login(request).await?;

    Ok(Json(response))
}

/// Register a new user account (ROLE_USER)
#[utoipa::path(
    post,
    path = "/api/accounts/register",
    tag = "accounts",
    request_body = AccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid input or name/email taken", body = crate::error::ApiError),
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AccountRequest>,
) -> Result<impl IntoResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let service = AuthService::new(state.db.clone(), state.jwt.clone());
    let account = service.register(request, Role::User).await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// Register a new admin account (ROLE_ADMIN)
#[utoipa::path(
    post,
    path = "/api/accounts/register/admin",
    tag = "accounts",
    request_body = AccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid input or name/email taken", body = crate::error::ApiError),
    )
)]
pub async fn register_admin(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AccountRequest>,
) -> Result<impl IntoResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let service = AuthService::new(state.db.clone(), state.jwt.clone());
    let account = service.register(request, Role::Admin).await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// List all accounts (admin only)
#[utoipa::path(
    get,
    path = "/api/accounts",
    tag = "accounts",
    responses(
        (status = 200, description = "All accounts", body = [AccountResponse]),
        (status = 401, description = "Unauthenticated", body = crate::error::ApiError),
        (status = 403, description = "Insufficient role", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::ListAccounts, &user)?;

    let accounts = AccountStore::new(state.db.clone()).list().await?;
    let response: Vec<AccountResponse> = accounts.into_iter().map(Into::into).collect();

    Ok(Json(response))
}
