//! Orchid handlers
//!
//! Reads for any role-bearing caller, listing by category for any
//! authenticated caller, mutations admin only.

use crate::auth::policy::{self, Operation};
use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::store::orchids::OrchidInput;
use crate::store::{CategoryStore, OrchidStore};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrchidRequest {
    #[validate(length(min = 1, max = 100))]
    pub orchid_name: String,
    #[validate(length(min = 1, max = 1000))]
    pub orchid_description: String,
    /// Opaque image URL; no upload handling
    pub orchid_url: Option<String>,
    pub price: Decimal,
    pub is_natural: bool,
    pub category_id: Option<i64>,
}

impl OrchidRequest {
    fn check(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if self.price <= Decimal::ZERO {
            return Err(AppError::BadRequest("Price must be positive".to_string()));
        }
        Ok(())
    }

    fn into_input(self) -> OrchidInput {
        OrchidInput {
            orchid_name: self.orchid_name,
            orchid_description: self.orchid_description,
            orchid_url: self.orchid_url,
            price: self.price,
            is_natural: self.is_natural,
            category_id: self.category_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrchidResponse {
    pub orchid_id: i64,
    pub orchid_name: String,
    pub orchid_description: String,
    pub orchid_url: Option<String>,
    pub price: Decimal,
    pub is_natural: bool,
    pub status: String,
    pub category_id: Option<i64>,
}

impl From<orchid_core::Orchid> for OrchidResponse {
    fn from(orchid: orchid_core::Orchid) -> Self {
        Self {
            orchid_id: orchid.orchid_id,
            orchid_name: orchid.orchid_name,
            orchid_description: orchid.orchid_description,
            orchid_url: orchid.orchid_url,
            price: orchid.price,
            is_natural: orchid.is_natural,
            status: orchid.status,
            category_id: orchid.category_id,
        }
    }
}

async fn ensure_category_exists(
    state: &AppState,
    category_id: Option<i64>,
) -> Result<(), AppError> {
    if let Some(category_id) = category_id {
        CategoryStore::new(state.db.clone())
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Category not found".to_string()))?;
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/orchids",
    tag = "orchids",
    responses(
        (status = 200, description = "Active orchids", body = [OrchidResponse]),
        (status = 403, description = "Insufficient role", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_orchids(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::ListOrchids, &user)?;

    let orchids = OrchidStore::new(state.db.clone()).list().await?;
    let response: Vec<OrchidResponse> = orchids.into_iter().map(Into::into).collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/orchids/{id}",
    tag = "orchids",
    params(("id" = i64, Path, description = "Orchid id")),
    responses(
        (status = 200, description = "Orchid", body = OrchidResponse),
        (status = 404, description = "Not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_orchid(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::GetOrchid, &user)?;

    let orchid = OrchidStore::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Orchid".to_string()))?;

    Ok(Json(OrchidResponse::from(orchid)))
}

#[utoipa::path(
    get,
    path = "/api/orchids/category/{categoryId}",
    tag = "orchids",
    params(("categoryId" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Orchids in the category", body = [OrchidResponse]),
        (status = 401, description = "Unauthenticated", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_orchids_by_category(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(category_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::ListOrchidsByCategory, &user)?;

    let orchids = OrchidStore::new(state.db.clone())
        .list_by_category(category_id)
        .await?;
    let response: Vec<OrchidResponse> = orchids.into_iter().map(Into::into).collect();

    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/orchids",
    tag = "orchids",
    request_body = OrchidRequest,
    responses(
        (status = 201, description = "Orchid created", body = OrchidResponse),
        (status = 400, description = "Invalid input", body = crate::error::ApiError),
        (status = 403, description = "Insufficient role", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_orchid(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<OrchidRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::CreateOrchid, &user)?;
    request.check()?;
    ensure_category_exists(&state, request.category_id).await?;

    let orchid = OrchidStore::new(state.db.clone())
        .create(&request.into_input())
        .await?;

    Ok((StatusCode::CREATED, Json(OrchidResponse::from(orchid))))
}

#[utoipa::path(
    put,
    path = "/api/orchids/{id}",
    tag = "orchids",
    params(("id" = i64, Path, description = "Orchid id")),
    request_body = OrchidRequest,
    responses(
        (status = 200, description = "Orchid updated", body = OrchidResponse),
        (status = 404, description = "Not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_orchid(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(request): Json<OrchidRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::UpdateOrchid, &user)?;
    request.check()?;
    ensure_category_exists(&state, request.category_id).await?;

    let orchid = OrchidStore::new(state.db.clone())
        .update(id, &request.into_input())
        .await?
        .ok_or_else(|| AppError::NotFound("Orchid".to_string()))?;

    Ok(Json(OrchidResponse::from(orchid)))
}

#[utoipa::path(
    delete,
    path = "/api/orchids/{id}",
    tag = "orchids",
    params(("id" = i64, Path, description = "Orchid id")),
    responses(
        (status = 204, description = "Orchid deleted"),
        (status = 404, description = "Not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_orchid(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::DeleteOrchid, &user)?;

    let deleted = OrchidStore::new(state.db.clone()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Orchid".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
