use axum::extract::State;
use axum::http::StatusCode;
use store::DlrApply;
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::dlr::DlrRequest;
use crate::state::AppState;

/// Receive a delivery receipt and reconcile the matching message.
#[utoipa::path(
    post,
    path = "/dlr",
    tag = "DLR",
    operation_id = "handleDlr",
    summary = "Apply a delivery receipt",
    description = "Transitions the message carrying the given provider id to its terminal status. Applying the same receipt twice is a no-op, as is a receipt for an unknown provider id.",
    request_body = DlrRequest,
    responses(
        (status = 204, description = "Receipt accepted"),
        (status = 400, description = "Malformed provider id or non-terminal status (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Store failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn handle_dlr(
    State(state): State<AppState>,
    AppJson(payload): AppJson<DlrRequest>,
) -> Result<StatusCode, AppError> {
    let dlr = payload.into_payload()?;

    if state.service.handle_dlr(&dlr).await? == DlrApply::Unknown {
        // Late receipts for pruned or unknown messages are dropped here.
        info!(provider_id = %dlr.provider_id, "ignoring DLR for unknown provider id");
    }

    Ok(StatusCode::NO_CONTENT)
}
