//! API route definitions

use crate::auth::auth_middleware;
use crate::handlers::{accounts, categories, orchids, orders, roles};
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create the `/api` routes
///
/// Public routes skip the middleware entirely; everything else requires a
/// valid bearer token before the handler's own policy check runs.
pub fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public_routes = Router::new()
        .route("/accounts/login", post(accounts::login))
        .route("/accounts/register", post(accounts::register))
        .route("/accounts/register/admin", post(accounts::register_admin));

    let protected_routes = Router::new()
        .route("/accounts", get(accounts::list_accounts))
        // Role administration
        .route("/roles", get(roles::list_roles).post(roles::create_role))
        .route(
            "/roles/:id",
            get(roles::get_role)
                .put(roles::update_role)
                .delete(roles::delete_role),
        )
        // Categories
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        // Orchids
        .route(
            "/orchids",
            get(orchids::list_orchids).post(orchids::create_orchid),
        )
        .route(
            "/orchids/:id",
            get(orchids::get_orchid)
                .put(orchids::update_orchid)
                .delete(orchids::delete_orchid),
        )
        .route(
            "/orchids/category/:category_id",
            get(orchids::list_orchids_by_category),
        )
        // Orders
        .route(
            "/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .route("/orders/my", get(orders::list_my_orders))
        .route(
            "/orders/:id",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}
