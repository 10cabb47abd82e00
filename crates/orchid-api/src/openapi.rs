//! OpenAPI document

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::service as auth_service;
use crate::error::ApiError;
use crate::handlers::{accounts, categories, health, orchids, orders, roles};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        accounts::login,
        accounts::register,
        accounts::register_admin,
        accounts::list_accounts,
        roles::list_roles,
        roles::get_role,
        roles::create_role,
        roles::update_role,
        roles::delete_role,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        orchids::list_orchids,
        orchids::get_orchid,
        orchids::list_orchids_by_category,
        orchids::create_orchid,
        orchids::update_orchid,
        orchids::delete_orchid,
        orders::list_orders,
        orders::list_my_orders,
        orders::get_order,
        orders::create_order,
        orders::update_order,
        orders::delete_order,
    ),
    components(schemas(
        ApiError,
        health::HealthResponse,
        auth_service::LoginRequest,
        auth_service::AuthResponse,
        auth_service::AccountRequest,
        auth_service::AccountResponse,
        roles::RoleRequest,
        roles::RoleResponse,
        categories::CategoryRequest,
        categories::CategoryResponse,
        orchids::OrchidRequest,
        orchids::OrchidResponse,
        orders::OrderItemRequest,
        orders::OrderItemResponse,
        orders::OrderDetailResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness"),
        (name = "accounts", description = "Login and registration"),
        (name = "roles", description = "Role administration"),
        (name = "categories", description = "Product categories"),
        (name = "orchids", description = "Shop catalogue"),
        (name = "orders", description = "Order placement and management"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
