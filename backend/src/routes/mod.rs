//! Route definitions for the SiteStock inventory core

use axum::{middleware, routing::get, Router};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - stock management
        .nest("/stock", stock_routes(state))
}

/// Stock management routes (protected).
///
/// Collection-style surface: PUT takes the id in the body, DELETE in the
/// query string.
fn stock_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Item catalog
        .route(
            "/",
            get(handlers::list_items)
                .post(handlers::create_item)
                .put(handlers::update_item)
                .delete(handlers::archive_item),
        )
        // Location registry
        .route(
            "/locations",
            get(handlers::list_locations)
                .post(handlers::create_location)
                .put(handlers::update_location)
                .delete(handlers::deactivate_location),
        )
        // Item-location assignments
        .route(
            "/locations/items",
            get(handlers::list_assignments)
                .post(handlers::assign_item)
                .put(handlers::update_assignment)
                .delete(handlers::unassign_item),
        )
        // Supplier directory
        .route(
            "/suppliers",
            get(handlers::list_suppliers)
                .post(handlers::create_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
        // Transaction ledger
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::record_transaction),
        )
        // Analytics: GET aggregates, POST per-item analysis
        .route(
            "/statistics",
            get(handlers::global_statistics).post(handlers::analyze_item),
        )
        // Alert engine: GET derived view, POST check-and-generate
        .route("/alerts", get(handlers::list_alerts).post(handlers::check_alerts))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
