pub use broccoli_queue::{
    brokers::broker::BrokerMessage,
    error::BroccoliError,
    queue::{BroccoliQueue, ConsumeOptions, PublishOptions},
};

/// Build the error a consume handler returns to leave a delivery unacked,
/// so the broker redelivers it.
pub fn handler_error(detail: impl Into<String>) -> BroccoliError {
    BroccoliError::Job(detail.into())
}
