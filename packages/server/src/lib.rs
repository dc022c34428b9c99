pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the intake API router.
pub fn build_api_router(state: AppState) -> Router {
    let (api, _openapi) = routes::api_routes().split_for_parts();

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .with_state(state)
}

/// Build the DLR webhook router.
pub fn build_dlr_router(state: AppState) -> Router {
    let (dlr, _openapi) = routes::dlr_routes().split_for_parts();

    Router::new().merge(dlr).with_state(state)
}
