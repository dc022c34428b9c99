use chrono::{DateTime, Utc};
use common::MessageStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Request body for creating a broadcast.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateBroadcastRequest {
    /// Human-readable broadcast name.
    #[schema(example = "spring-sale")]
    pub name: String,
    /// Message body sent to every recipient.
    #[schema(example = "Everything 20% off today")]
    pub body: String,
    /// Destination addresses. At least one required.
    pub recipients: Vec<String>,
}

/// Response after committing a broadcast to the outbox.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CreateBroadcastResponse {
    /// Identifier of the created broadcast.
    pub broadcast_id: Uuid,
    /// Number of messages committed to the outbox.
    #[schema(example = 2)]
    pub queued: usize,
}

/// A broadcast and the current state of each of its messages.
#[derive(Serialize, utoipa::ToSchema)]
pub struct BroadcastResponse {
    pub id: Uuid,
    #[schema(example = "spring-sale")]
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<MessageItem>,
}

/// Per-message state in a broadcast read-back.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageItem {
    pub id: Uuid,
    #[schema(example = "+15551234567")]
    pub to: String,
    pub status: MessageStatus,
    /// External id once the gateway has accepted the message.
    pub provider_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<store::entity::message::Model> for MessageItem {
    fn from(m: store::entity::message::Model) -> Self {
        Self {
            id: m.id,
            to: m.to,
            status: m.status,
            provider_id: m.provider_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Validate a broadcast creation request. Runs before any store interaction.
pub fn validate_create_broadcast(req: &CreateBroadcastRequest) -> Result<(), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if req.body.is_empty() {
        return Err(AppError::Validation("Body is required".into()));
    }
    if req.recipients.is_empty() {
        return Err(AppError::Validation(
            "At least one recipient is required".into(),
        ));
    }
    if req.recipients.iter().any(|r| r.trim().is_empty()) {
        return Err(AppError::Validation("Recipients must not be blank".into()));
    }
    Ok(())
}
