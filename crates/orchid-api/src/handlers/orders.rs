//! Order handlers
//!
//! Placement and "my orders" belong to users; full listing, update and
//! delete are admin operations. Single-order reads apply the ownership
//! check after the role gate: a non-admin asking for someone else's order
//! gets a 404, the same as for an order that does not exist.

use crate::auth::policy::{self, Operation};
use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::store::orders::{NewOrder, NewOrderDetail, OrderUpdate};
use crate::store::{AccountStore, OrchidStore, OrderStore};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use orchid_core::ORDER_STATUS_NEW;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    /// Orchid being ordered; one line item is created when present
    pub orchid_id: Option<i64>,
    pub order_date: Option<DateTime<Utc>>,
    pub order_status: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub order_id: i64,
    pub account_id: i64,
    pub account_username: String,
    pub order_date: DateTime<Utc>,
    pub order_status: String,
    pub total_amount: Decimal,
    pub order_details: Vec<OrderDetailResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailResponse {
    pub id: i64,
    pub orchid_id: i64,
    pub orchid_name: String,
    pub orchid_url: Option<String>,
    pub quantity: i32,
    pub price: Decimal,
}

impl From<orchid_core::Order> for OrderItemResponse {
    fn from(order: orchid_core::Order) -> Self {
        Self {
            order_id: order.order_id,
            account_id: order.account_id,
            account_username: order.account_name,
            order_date: order.order_date,
            order_status: order.order_status,
            total_amount: order.total_amount,
            order_details: order
                .details
                .into_iter()
                .map(|d| OrderDetailResponse {
                    id: d.id,
                    orchid_id: d.orchid_id,
                    orchid_name: d.orchid_name,
                    orchid_url: d.orchid_url,
                    quantity: d.quantity,
                    price: d.price,
                })
                .collect(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "orders",
    responses(
        (status = 200, description = "All orders", body = [OrderItemResponse]),
        (status = 403, description = "Insufficient role", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::ListOrders, &user)?;

    let orders = OrderStore::new(state.db.clone()).list().await?;
    let response: Vec<OrderItemResponse> = orders.into_iter().map(Into::into).collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/orders/my",
    tag = "orders",
    responses(
        (status = 200, description = "Caller's orders", body = [OrderItemResponse]),
        (status = 403, description = "Insufficient role", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_my_orders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::ListMyOrders, &user)?;

    let orders = OrderStore::new(state.db.clone())
        .list_by_account_name(&user.subject)
        .await?;
    let response: Vec<OrderItemResponse> = orders.into_iter().map(Into::into).collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = OrderItemResponse),
        (status = 404, description = "Not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::GetOrder, &user)?;

    let order = OrderStore::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

    // Ownership: non-admins only see their own orders
    if !user.is_admin() && order.account_name != user.subject {
        return Err(AppError::NotFound("Order".to_string()));
    }

    Ok(Json(OrderItemResponse::from(order)))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "orders",
    request_body = OrderItemRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderItemResponse),
        (status = 400, description = "Invalid input", body = crate::error::ApiError),
        (status = 403, description = "Insufficient role", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<OrderItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::CreateOrder, &user)?;

    let price = request
        .price
        .ok_or_else(|| AppError::BadRequest("Price is required".to_string()))?;
    let quantity = request
        .quantity
        .ok_or_else(|| AppError::BadRequest("Quantity is required".to_string()))?;
    if price <= Decimal::ZERO {
        return Err(AppError::BadRequest("Price must be positive".to_string()));
    }
    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "Quantity must be positive".to_string(),
        ));
    }

    // The order always belongs to the authenticated subject
    let account = AccountStore::new(state.db.clone())
        .find_by_name(&user.subject)
        .await?
        .ok_or_else(|| AppError::NotFound("Account".to_string()))?;

    let detail = match request.orchid_id {
        Some(orchid_id) => {
            OrchidStore::new(state.db.clone())
                .find_by_id(orchid_id)
                .await?
                .ok_or_else(|| AppError::BadRequest("Orchid not found".to_string()))?;
            Some(NewOrderDetail {
                orchid_id,
                quantity,
                price,
            })
        }
        None => None,
    };

    let new_order = NewOrder {
        account_id: account.account_id,
        order_date: request.order_date,
        order_status: request
            .order_status
            .unwrap_or_else(|| ORDER_STATUS_NEW.to_string()),
        total_amount: price * Decimal::from(quantity),
        detail,
    };

    let order = OrderStore::new(state.db.clone()).create(&new_order).await?;
    tracing::info!(order_id = order.order_id, account = %user.subject, "order placed");

    Ok((StatusCode::CREATED, Json(OrderItemResponse::from(order))))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order id")),
    request_body = OrderItemRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderItemResponse),
        (status = 404, description = "Not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(request): Json<OrderItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::UpdateOrder, &user)?;

    if let Some(price) = request.price {
        if price <= Decimal::ZERO {
            return Err(AppError::BadRequest("Price must be positive".to_string()));
        }
    }

    let total_amount = match (request.price, request.quantity) {
        (Some(price), Some(quantity)) if quantity > 0 => Some(price * Decimal::from(quantity)),
        (Some(price), None) => Some(price),
        _ => None,
    };

    let update = OrderUpdate {
        order_date: request.order_date,
        order_status: request.order_status,
        total_amount,
    };

    let order = OrderStore::new(state.db.clone())
        .update(id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

    Ok(Json(OrderItemResponse::from(order)))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    policy::enforce(Operation::DeleteOrder, &user)?;

    let deleted = OrderStore::new(state.db.clone()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Order".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_request_wire_format() {
        let json = r#"{"orchidId":3,"price":"12.50","quantity":2}"#;
        let request: OrderItemRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.orchid_id, Some(3));
        assert_eq!(request.quantity, Some(2));
        assert_eq!(request.price, Some(Decimal::new(1250, 2)));
    }

    #[test]
    fn test_order_response_total_and_fields() {
        let order = orchid_core::Order {
            order_id: 9,
            account_id: 2,
            account_name: "user".to_string(),
            order_date: Utc::now(),
            order_status: ORDER_STATUS_NEW.to_string(),
            total_amount: Decimal::new(2500, 2),
            details: vec![orchid_core::OrderDetail {
                id: 1,
                orchid_id: 3,
                orchid_name: "Vanda".to_string(),
                orchid_url: None,
                quantity: 2,
                price: Decimal::new(1250, 2),
            }],
        };

        let response = OrderItemResponse::from(order);
        assert_eq!(response.order_id, 9);
        assert_eq!(response.account_username, "user");
        assert_eq!(response.order_details.len(), 1);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"orderId\":9"));
        assert!(json.contains("\"accountUsername\":\"user\""));
    }
}
