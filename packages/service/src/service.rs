use chrono::Duration;
use common::{Broadcast, DlrPayload, MessagePublisher, MessageStatus, SmsGateway, SmsMessage};
use store::entity::{broadcast, message};
use store::{DlrApply, MessageRepository};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::ServiceError;

/// Outcome of a single send attempt against the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Gateway accepted the submission; the row moved to `sent`.
    Sent { provider_id: String },
    /// Gateway refused the message; the row moved to `failed`.
    Rejected,
}

/// Orchestrates the outbox pipeline use-cases over the store.
///
/// Broker and gateway ports are passed to the operations that need them,
/// so each binary wires only the collaborators it owns.
#[derive(Clone)]
pub struct BroadcastService {
    repo: MessageRepository,
}

impl BroadcastService {
    pub fn new(repo: MessageRepository) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &MessageRepository {
        &self.repo
    }

    /// Persist a broadcast and one pending message per recipient in a
    /// single commit.
    pub async fn create_broadcast(
        &self,
        name: &str,
        body: &str,
        recipients: &[String],
    ) -> Result<Broadcast, ServiceError> {
        if recipients.is_empty() {
            return Err(ServiceError::InvalidInput(
                "recipients must not be empty".into(),
            ));
        }

        let b = Broadcast::new(name);
        let messages: Vec<SmsMessage> = recipients
            .iter()
            .map(|to| SmsMessage::new(b.id, to.clone(), body))
            .collect();

        self.repo.create_broadcast(&b, &messages).await?;

        info!(
            broadcast_id = %b.id,
            recipients = messages.len(),
            "broadcast created"
        );
        Ok(b)
    }

    /// Read a broadcast and its messages.
    pub async fn get_broadcast(
        &self,
        id: Uuid,
    ) -> Result<(broadcast::Model, Vec<message::Model>), ServiceError> {
        Ok(self.repo.broadcast_with_messages(id).await?)
    }

    /// One poll cycle: move up to `batch_size` pending rows to `queued` and
    /// hand them to the broker, oldest first.
    ///
    /// The queued transition is persisted before the publish, so a crash in
    /// between leaves the row in `queued` for the janitor to release. A row
    /// whose transition is lost to a concurrent publisher is skipped; a row
    /// whose publish fails is compensated back to `pending` for the next
    /// cycle. Per-row errors never abort the cycle. Returns the number of
    /// messages actually published.
    pub async fn publish_pending(
        &self,
        publisher: &dyn MessagePublisher,
        batch_size: u64,
    ) -> Result<usize, ServiceError> {
        let batch = self.repo.pending_batch(batch_size).await?;

        let mut published = 0;
        for row in batch {
            let mut msg = SmsMessage::from(row);

            match self
                .repo
                .transition_status(msg.id, MessageStatus::Pending, MessageStatus::Queued)
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    info!(msg_id = %msg.id, "row claimed by concurrent publisher, skipping");
                    continue;
                }
                Err(e) => {
                    error!(msg_id = %msg.id, error = %e, "mark queued failed");
                    continue;
                }
            }
            msg.status = MessageStatus::Queued;

            if let Err(e) = publisher.publish(&msg).await {
                // Roll back to pending so the next poll retries it.
                if let Err(rollback) = self.repo.release_to_pending(msg.id).await {
                    error!(msg_id = %msg.id, error = %rollback, "compensating release failed");
                }
                error!(msg_id = %msg.id, error = %e, "publish failed");
                continue;
            }

            published += 1;
            info!(msg_id = %msg.id, to = %msg.to, "message queued");
        }

        Ok(published)
    }

    /// Janitor pass for rows stranded in `queued` by a crash between the
    /// status update and the broker publish: anything untouched for longer
    /// than `older_than` goes back to `pending` and re-enters the next
    /// cycle.
    pub async fn release_stale_queued(&self, older_than: Duration) -> Result<u64, ServiceError> {
        let released = self.repo.release_stale_queued(older_than).await?;
        if released > 0 {
            warn!(released, "released stale queued messages back to pending");
        }
        Ok(released)
    }

    /// Submit one dequeued message to the gateway and record the result.
    ///
    /// A permanent gateway rejection marks the row `failed` and returns
    /// `Rejected`; the caller acknowledges the delivery. Transient failures
    /// (gateway unreachable, store unavailable after an accepted submit)
    /// surface as errors so the caller can leave the delivery unacked for
    /// the broker to redeliver; no status transition happens in that case.
    pub async fn send_message(
        &self,
        gateway: &dyn SmsGateway,
        msg: &SmsMessage,
    ) -> Result<SendOutcome, ServiceError> {
        let result = match gateway.send(msg).await {
            Ok(r) => r,
            Err(e) if e.is_permanent() => {
                warn!(msg_id = %msg.id, error = %e, "gateway rejected message");
                let failed = self
                    .repo
                    .transition_status(msg.id, MessageStatus::Queued, MessageStatus::Failed)
                    .await?;
                if !failed {
                    info!(msg_id = %msg.id, "row no longer queued, skipping failed transition");
                }
                return Ok(SendOutcome::Rejected);
            }
            Err(e) => return Err(e.into()),
        };

        let recorded = self
            .repo
            .set_provider_id(msg.id, &result.provider_id)
            .await?;
        if !recorded {
            // An earlier attempt already recorded an id; the first one wins.
            info!(
                msg_id = %msg.id,
                provider_id = %result.provider_id,
                "provider id already recorded, keeping the first"
            );
        }

        let sent = self
            .repo
            .transition_status(msg.id, MessageStatus::Queued, MessageStatus::Sent)
            .await?;
        if !sent {
            info!(msg_id = %msg.id, "row no longer queued, skipping sent transition");
        }

        info!(msg_id = %msg.id, provider_id = %result.provider_id, "message sent");
        Ok(SendOutcome::Sent {
            provider_id: result.provider_id,
        })
    }

    /// Reconcile a delivery receipt by external id. Unknown ids are reported
    /// but are not an error; late receipts for pruned or unknown messages
    /// are dropped at the boundary.
    pub async fn handle_dlr(&self, dlr: &DlrPayload) -> Result<DlrApply, ServiceError> {
        let provider_id = dlr.provider_id.to_string();
        let outcome = self.repo.apply_dlr(&provider_id, dlr.status).await?;

        match outcome {
            DlrApply::Applied => {
                info!(provider_id = %provider_id, status = %dlr.status, "DLR applied");
            }
            DlrApply::AlreadyTerminal => {
                info!(provider_id = %provider_id, status = %dlr.status, "DLR replay ignored");
            }
            DlrApply::Unknown => {
                info!(provider_id = %provider_id, "DLR for unknown provider id");
            }
        }

        Ok(outcome)
    }
}
