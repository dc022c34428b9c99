use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::message::SmsMessage;

/// Core trait for all MQ messages.
pub trait Message: Serialize + DeserializeOwned + Debug + Send + Sync + Clone {
    /// Stable type tag for the message.
    fn message_type() -> &'static str
    where
        Self: Sized;

    /// Correlation id carried with every delivery.
    fn message_id(&self) -> String;
}

#[derive(Debug, Error)]
pub enum MqError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Consume failed: {0}")]
    Consume(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Port for handing outbox messages to the broker.
///
/// `publish` must return only after the broker has durably accepted the
/// message; the publisher's compensation logic relies on that.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, msg: &SmsMessage) -> Result<(), MqError>;
}
