use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message_status::MessageStatus;
use crate::mq::Message;

/// An immutable grouping record for the messages created by one intake call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Broadcast {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Broadcast {
    /// Create a new broadcast with a generated id and a UTC creation time.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// A single recipient message as it travels through the pipeline.
///
/// This is both the broker wire format and the shape of a `messages` row.
/// Field names and the RFC 3339 timestamp rendering are part of the wire
/// contract and must stay stable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    pub id: Uuid,
    pub broadcast_id: Uuid,
    /// Destination address; opaque to the pipeline.
    pub to: String,
    pub body: String,
    pub status: MessageStatus,
    /// External id assigned by the gateway after the first accepted submit.
    pub provider_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SmsMessage {
    /// Create a new pending message for a broadcast.
    ///
    /// The id and both timestamps are assigned here, in the domain, so the
    /// store never has to default them.
    pub fn new(broadcast_id: Uuid, to: impl Into<String>, body: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            broadcast_id,
            to: to.into(),
            body: body.into(),
            status: MessageStatus::Pending,
            provider_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Message for SmsMessage {
    fn message_type() -> &'static str {
        "sms.send"
    }

    fn message_id(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_is_pending() {
        let broadcast = Broadcast::new("launch");
        let msg = SmsMessage::new(broadcast.id, "+15551234567", "hello");

        assert_eq!(msg.status, MessageStatus::Pending);
        assert_eq!(msg.broadcast_id, broadcast.id);
        assert!(msg.provider_id.is_none());
        assert_eq!(msg.created_at, msg.updated_at);
    }

    #[test]
    fn test_wire_field_names() {
        let msg = SmsMessage::new(Uuid::new_v4(), "+1", "hi");
        let value = serde_json::to_value(&msg).unwrap();

        for field in [
            "id",
            "broadcast_id",
            "to",
            "body",
            "status",
            "provider_id",
            "created_at",
            "updated_at",
        ] {
            assert!(value.get(field).is_some(), "missing wire field '{field}'");
        }
        assert_eq!(value["status"], "pending");
        assert!(value["provider_id"].is_null());
    }

    #[test]
    fn test_wire_roundtrip() {
        let mut msg = SmsMessage::new(Uuid::new_v4(), "+15550000001", "hello");
        msg.provider_id = Some(Uuid::new_v4().to_string());

        let json = serde_json::to_string(&msg).unwrap();
        let parsed: SmsMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, parsed);
    }
}
