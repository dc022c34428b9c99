use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers;
use crate::state::AppState;

/// Intake API routes, nested under `/api`.
pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::broadcast::create_broadcast))
        .routes(routes!(handlers::broadcast::get_broadcast))
}

/// DLR webhook routes, mounted at the root.
pub fn dlr_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::dlr::handle_dlr))
}
