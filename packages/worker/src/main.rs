mod config;
mod gateway;

use std::sync::Arc;

use anyhow::Context;
use common::SmsMessage;
use mq::{BroccoliError, BrokerMessage, SmsQueue, handler_error};
use service::BroadcastService;
use store::MessageRepository;
use tracing::{error, info};

use crate::gateway::HttpSmsGateway;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = config::WorkerConfig::load().context("Failed to load config")?;

    let db = store::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    store::ensure_schema(&db)
        .await
        .context("Failed to ensure schema")?;

    let queue = SmsQueue::connect(&config.mq)
        .await
        .context("Failed to connect to broker")?;

    let gateway = HttpSmsGateway::new(&config.gateway.base_url, &config.gateway.dlr_webhook_url)
        .context("Failed to build gateway client")?;
    let gateway = Arc::new(gateway);
    let svc = Arc::new(BroadcastService::new(MessageRepository::new(db)));

    info!(
        queue = %queue.queue_name(),
        gateway = %config.gateway.base_url,
        "sender-worker started"
    );

    let consume = queue.process_messages(move |delivery: BrokerMessage<SmsMessage>| {
        let svc = Arc::clone(&svc);
        let gateway = Arc::clone(&gateway);
        async move { process_delivery(delivery, &svc, gateway.as_ref()).await }
    });

    tokio::select! {
        result = consume => {
            if let Err(e) = result {
                error!(error = %e, "worker stopped unexpectedly");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            // An in-flight delivery stays unacked and will be redelivered.
            info!("shutdown signal received");
        }
    }

    Ok(())
}

/// Handle one delivery. `Ok` acknowledges it; `Err` leaves it for redelivery.
async fn process_delivery(
    delivery: BrokerMessage<SmsMessage>,
    svc: &BroadcastService,
    gateway: &HttpSmsGateway,
) -> Result<(), BroccoliError> {
    let msg = delivery.payload;
    info!(msg_id = %msg.id, to = %msg.to, "received message");

    match svc.send_message(gateway, &msg).await {
        Ok(outcome) => {
            info!(msg_id = %msg.id, ?outcome, "delivery processed");
            Ok(())
        }
        Err(e) => {
            error!(msg_id = %msg.id, error = %e, "send failed, awaiting redelivery");
            Err(handler_error(format!("send failed: {e}")))
        }
    }
}
