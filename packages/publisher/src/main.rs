mod config;

use std::time::Duration;

use anyhow::Context;
use mq::SmsQueue;
use service::BroadcastService;
use store::MessageRepository;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = config::PublisherConfig::load().context("Failed to load config")?;

    let db = store::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    store::ensure_schema(&db)
        .await
        .context("Failed to ensure schema")?;

    let queue = SmsQueue::connect(&config.mq)
        .await
        .context("Failed to connect to broker")?;
    let svc = BroadcastService::new(MessageRepository::new(db));

    let batch_size = config.outbox.batch_size;
    let requeue_after = chrono::Duration::seconds(config.outbox.requeue_after_secs as i64);

    info!(
        tick_interval_secs = config.outbox.tick_interval_secs,
        batch_size,
        requeue_after_secs = config.outbox.requeue_after_secs,
        queue = %queue.queue_name(),
        "outbox-publisher started"
    );

    // The first tick fires immediately, so startup begins with a poll.
    let mut interval =
        tokio::time::interval(Duration::from_secs(config.outbox.tick_interval_secs));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                return Ok(());
            }
            _ = interval.tick() => {
                if let Err(e) = poll_once(&svc, &queue, batch_size, requeue_after).await {
                    // Keep polling; a broken cycle must not take the service down.
                    error!(error = %e, "poll cycle failed");
                }
            }
        }
    }
}

/// One tick: release orphaned queued rows, then drain a pending batch.
async fn poll_once(
    svc: &BroadcastService,
    queue: &SmsQueue,
    batch_size: u64,
    requeue_after: chrono::Duration,
) -> anyhow::Result<()> {
    svc.release_stale_queued(requeue_after).await?;

    let published = svc.publish_pending(queue, batch_size).await?;
    if published > 0 {
        info!(count = published, "published messages");
    }

    Ok(())
}
