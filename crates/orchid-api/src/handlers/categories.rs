//! Category handlers
//!
//! Reads need any authenticated caller; mutations are admin only.

use crate::auth::policy::{self, Operation};
use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::store::CategoryStore;
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
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub category_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub category_id: i64,
    pub category_name: String,
    pub status: String,
}

impl From<orchid_core::Category> for CategoryResponse {
    fn from(category: orchid_core::Category) -> Self {
        Self {
            category_id: category.category_id,
            category_name: category.category_name,
            status: category.status,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Active categories", body = [CategoryResponse]),
        (status = 401, description = "Unauthenticated", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::ListCategories, &user)?;

    let categories = CategoryStore::new(state.db.clone()).list().await?;
    let response: Vec<CategoryResponse> = categories.into_iter().map(Into::into).collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 404, description = "Not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::GetCategory, &user)?;

    let category = CategoryStore::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

    Ok(Json(CategoryResponse::from(category)))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 403, description = "Insufficient role", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::CreateCategory, &user)?;
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let category = CategoryStore::new(state.db.clone())
        .create(&request.category_name)
        .await?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(request): Json<CategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::UpdateCategory, &user)?;
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let category = CategoryStore::new(state.db.clone())
        .update(id, &request.category_name)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

    Ok(Json(CategoryResponse::from(category)))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::DeleteCategory, &user)?;

    let deleted = CategoryStore::new(state.db.clone()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Category".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
