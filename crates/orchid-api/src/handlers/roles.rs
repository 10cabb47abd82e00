//! Role CRUD handlers (admin only)

use crate::auth::policy::{self, Operation};
use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::store::RoleStore;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    #[validate(length(min = 1, max = 50))]
    pub role_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub role_id: i64,
    pub role_name: String,
}

impl From<orchid_core::Role> for RoleResponse {
    fn from(role: orchid_core::Role) -> Self {
        Self {
            role_id: role.role_id,
            role_name: role.role_name,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "roles",
    responses(
        (status = 200, description = "All roles", body = [RoleResponse]),
        (status = 403, description = "Insufficient role", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_roles(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::ListRoles, &user)?;

    let roles = RoleStore::new(state.db.clone()).list().await?;
    let response: Vec<RoleResponse> = roles.into_iter().map(Into::into).collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    tag = "roles",
    params(("id" = i64, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role", body = RoleResponse),
        (status = 404, description = "Not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_role(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::GetRole, &user)?;

    let role = RoleStore::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Role".to_string()))?;

    Ok(Json(RoleResponse::from(role)))
}

#[utoipa::path(
    post,
    path = "/api/roles",
    tag = "roles",
    request_body = RoleRequest,
    responses(
        (status = 201, description = "Role created", body = RoleResponse),
        (status = 400, description = "Invalid input", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_role(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<RoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::CreateRole, &user)?;
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let role = RoleStore::new(state.db.clone())
        .create(&request.role_name)
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

#[utoipa::path(
    put,
    path = "/api/roles/{id}",
    tag = "roles",
    params(("id" = i64, Path, description = "Role id")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Role updated", body = RoleResponse),
        (status = 404, description = "Not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_role(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(request): Json<RoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::UpdateRole, &user)?;
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let role = RoleStore::new(state.db.clone())
        .update(id, &request.role_name)
        .await?
        .ok_or_else(|| AppError::NotFound("Role".to_string()))?;

    Ok(Json(RoleResponse::from(role)))
}

#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    tag = "roles",
    params(("id" = i64, Path, description = "Role id")),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 404, description = "Not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_role(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::DeleteRole, &user)?;

    let deleted = RoleStore::new(state.db.clone()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Role".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
