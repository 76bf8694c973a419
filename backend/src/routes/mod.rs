//! Route definitions for the Trade Certificate Platform

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Auth routes (public)
        .route("/auth/login", post(handlers::login))
        // Public certificate lookups (unauthenticated - for issued links)
        .route("/certificates/guid/:guid", get(handlers::get_certificate_by_guid))
        .route("/certificates/search", get(handlers::search_certificate))
        // Public verification resolver
        .route("/verify", get(handlers::verify_certificate))
        // Development seeding
        .route("/seed", post(handlers::run_seed))
        // Protected routes - certificate management
        .nest("/certificates", certificate_routes(state))
        // Protected routes - admin account management
        .nest("/admins", admin_routes(state))
}

/// Certificate management routes (protected)
fn certificate_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_certificates).post(handlers::create_certificate),
        )
        .route(
            "/:certificate_id",
            get(handlers::get_certificate)
                .put(handlers::update_certificate)
                .delete(handlers::delete_certificate),
        )
        .route("/:certificate_id/guid", post(handlers::regenerate_guid))
        .route("/:certificate_id/products", post(handlers::add_product))
        .route(
            "/:certificate_id/products/:product_id",
            axum::routing::put(handlers::update_product).delete(handlers::remove_product),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
}

/// Admin account management routes (protected)
fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_admins).post(handlers::create_admin))
        .route(
            "/:admin_id",
            get(handlers::get_admin)
                .put(handlers::update_admin)
                .delete(handlers::delete_admin),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
}
