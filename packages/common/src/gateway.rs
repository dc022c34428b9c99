use async_trait::async_trait;
use thiserror::Error;

use crate::message::SmsMessage;

/// Response from the SMS gateway after submitting a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendResult {
    /// External message id assigned by the gateway.
    pub provider_id: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway answered and refused the message. Terminal for this
    /// delivery attempt.
    #[error("gateway rejected message: {0}")]
    Rejected(String),

    /// The gateway could not be reached or its answer could not be read.
    /// The attempt may be retried.
    #[error("gateway unreachable: {0}")]
    Transport(String),
}

impl GatewayError {
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Port for the external SMS gateway.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Submit a message and return the gateway-assigned external id.
    async fn send(&self, msg: &SmsMessage) -> Result<SendResult, GatewayError>;
}
