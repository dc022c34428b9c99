use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::message_status::MessageStatus;

/// Normalised delivery receipt from the gateway webhook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlrPayload {
    /// External id the gateway assigned at submit time.
    pub provider_id: Uuid,
    /// Terminal status reported by the gateway.
    pub status: MessageStatus,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DlrError {
    #[error("'{0}' is not a terminal status; expected 'delivered' or 'failed'")]
    NotTerminal(MessageStatus),
}

impl DlrPayload {
    /// Build a receipt, rejecting anything but the two terminal statuses.
    pub fn new(provider_id: Uuid, status: MessageStatus) -> Result<Self, DlrError> {
        if !status.is_terminal() {
            return Err(DlrError::NotTerminal(status));
        }
        Ok(Self {
            provider_id,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_terminal_statuses() {
        let id = Uuid::new_v4();
        assert!(DlrPayload::new(id, MessageStatus::Delivered).is_ok());
        assert!(DlrPayload::new(id, MessageStatus::Failed).is_ok());
    }

    #[test]
    fn test_rejects_non_terminal_statuses() {
        let id = Uuid::new_v4();
        for status in [
            MessageStatus::Pending,
            MessageStatus::Queued,
            MessageStatus::Sent,
        ] {
            assert_eq!(
                DlrPayload::new(id, status),
                Err(DlrError::NotTerminal(status))
            );
        }
    }
}
