// Library crate for the BatiRenov devis service
// Exports modules for use by the form binary and tests

pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{create_devis, devis_test, my_devis};
use crate::middlewares::auth_middleware;
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .route("/api/devis/my-devis", get(my_devis))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        // Public devis routes
        .route("/api/devis/create", post(create_devis))
        .route("/api/devis/test", get(devis_test))
        // Protected routes
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        // The form is served from a separate origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
