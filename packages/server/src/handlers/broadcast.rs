use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::broadcast::{
    BroadcastResponse, CreateBroadcastRequest, CreateBroadcastResponse, MessageItem,
    validate_create_broadcast,
};
use crate::state::AppState;

/// Create a broadcast.
#[utoipa::path(
    post,
    path = "/broadcasts",
    tag = "Broadcasts",
    operation_id = "createBroadcast",
    summary = "Create a broadcast",
    description = "Commits one outbox message per recipient together with the broadcast record in a single transaction. Messages are picked up asynchronously by the outbox publisher.",
    request_body = CreateBroadcastRequest,
    responses(
        (status = 201, description = "Broadcast committed to the outbox", body = CreateBroadcastResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Store failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_broadcast(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateBroadcastRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_broadcast(&payload)?;

    let broadcast = state
        .service
        .create_broadcast(&payload.name, &payload.body, &payload.recipients)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBroadcastResponse {
            broadcast_id: broadcast.id,
            queued: payload.recipients.len(),
        }),
    ))
}

/// Read back a broadcast and its messages.
#[utoipa::path(
    get,
    path = "/broadcasts/{id}",
    tag = "Broadcasts",
    operation_id = "getBroadcast",
    summary = "Get a broadcast",
    description = "Returns the broadcast and the current delivery state of each of its messages.",
    params(
        ("id" = Uuid, Path, description = "Broadcast ID")
    ),
    responses(
        (status = 200, description = "Broadcast details", body = BroadcastResponse),
        (status = 404, description = "Broadcast not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(broadcast_id = %id))]
pub async fn get_broadcast(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BroadcastResponse>, AppError> {
    let (broadcast, messages) = state.service.get_broadcast(id).await?;

    Ok(Json(BroadcastResponse {
        id: broadcast.id,
        name: broadcast.name,
        created_at: broadcast.created_at,
        messages: messages.into_iter().map(MessageItem::from).collect(),
    }))
}
