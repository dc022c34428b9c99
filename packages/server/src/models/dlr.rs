use std::str::FromStr;

use common::{DlrPayload, MessageStatus};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;

/// Delivery receipt posted by the gateway.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct DlrRequest {
    /// Gateway-assigned external id, in canonical UUID form.
    pub provider_id: String,
    /// Terminal status: `delivered` or `failed`.
    #[schema(example = "delivered")]
    pub status: String,
}

impl DlrRequest {
    /// Parse and validate into the domain payload.
    pub fn into_payload(self) -> Result<DlrPayload, AppError> {
        let provider_id = Uuid::from_str(&self.provider_id)
            .map_err(|_| AppError::Validation("provider_id must be a valid UUID".into()))?;

        let status = MessageStatus::from_str(&self.status)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        DlrPayload::new(provider_id, status).map_err(|e| AppError::Validation(e.to_string()))
    }
}
