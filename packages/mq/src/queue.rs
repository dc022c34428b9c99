use std::future::Future;

use async_trait::async_trait;
use broccoli_queue::queue::BroccoliQueue;
use common::{Message, MessagePublisher, MqError, SmsMessage};
use tracing::debug;

use crate::config::MqConfig;
use crate::models::{BroccoliError, BrokerMessage};

/// Handle to the SMS work queue.
///
/// The queue is named, durable on the broker side, and consumed one
/// delivery at a time per worker; the handler's result is the ack decision.
#[derive(Clone)]
pub struct SmsQueue {
    queue: BroccoliQueue,
    queue_name: String,
}

impl SmsQueue {
    /// Connect to the broker and return a queue handle. The queue itself is
    /// declared lazily by the broker on first use, so processes may start
    /// in any order.
    pub async fn connect(config: &MqConfig) -> Result<Self, MqError> {
        let queue = BroccoliQueue::builder(&config.url)
            .pool_connections(config.pool_size)
            .build()
            .await
            .map_err(|e| MqError::Connection(e.to_string()))?;

        Ok(Self {
            queue,
            queue_name: config.queue_name.clone(),
        })
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Publish one message; returns only after the broker has accepted it.
    pub async fn publish_message<M: Message>(&self, msg: &M) -> Result<(), MqError> {
        self.queue
            .publish(&self.queue_name, None, msg, None)
            .await
            .map_err(|e| MqError::Publish(e.to_string()))?;

        debug!(
            message_type = M::message_type(),
            message_id = %msg.message_id(),
            "message published"
        );
        Ok(())
    }

    /// Consume deliveries serially, passing each to `handler`. Returning
    /// `Ok` acknowledges the delivery; returning `Err` leaves it for
    /// redelivery. A payload that fails typed deserialization is dropped by
    /// the broker without requeue. Blocks until the consumer stops.
    pub async fn process_messages<M, F, Fut>(&self, handler: F) -> Result<(), BroccoliError>
    where
        M: Message + 'static,
        F: Fn(BrokerMessage<M>) -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = Result<(), BroccoliError>> + Send + 'static,
    {
        self.queue
            .process_messages(&self.queue_name, None, None, handler)
            .await
    }
}

#[async_trait]
impl MessagePublisher for SmsQueue {
    async fn publish(&self, msg: &SmsMessage) -> Result<(), MqError> {
        self.publish_message(msg).await
    }
}
