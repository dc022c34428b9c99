use common::{GatewayError, MqError};
use store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid broadcast: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Mq(#[from] MqError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
