use chrono::{Duration, Utc};
use common::{Broadcast, MessageStatus, SmsMessage};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, sea_query::Expr,
};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::entity::{broadcast, message};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("broadcast not found")]
    BroadcastNotFound,

    #[error("message not found")]
    MessageNotFound,

    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

/// Outcome of applying a delivery receipt by provider id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DlrApply {
    /// The matching row transitioned to the receipt's status.
    Applied,
    /// The matching row is already terminal. Replays and conflicting late
    /// receipts both land here and change nothing.
    AlreadyTerminal,
    /// No row carries this provider id.
    Unknown,
}

/// Thin typed query layer for broadcasts and messages. Every write the
/// pipeline performs goes through here; no component caches rows across
/// operations.
#[derive(Clone)]
pub struct MessageRepository {
    db: DatabaseConnection,
}

impl MessageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Insert a broadcast and all of its messages in a single transaction.
    /// A reader can never observe the broadcast without its messages or
    /// vice versa.
    pub async fn create_broadcast(
        &self,
        b: &Broadcast,
        messages: &[SmsMessage],
    ) -> Result<(), StoreError> {
        let txn = self.db.begin().await?;

        broadcast::Entity::insert(broadcast::ActiveModel::from(b))
            .exec(&txn)
            .await?;

        if !messages.is_empty() {
            message::Entity::insert_many(messages.iter().map(message::ActiveModel::from))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Read a broadcast and its messages, oldest message first.
    pub async fn broadcast_with_messages(
        &self,
        id: Uuid,
    ) -> Result<(broadcast::Model, Vec<message::Model>), StoreError> {
        let b = broadcast::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::BroadcastNotFound)?;

        let messages = message::Entity::find()
            .filter(message::Column::BroadcastId.eq(id))
            .order_by_asc(message::Column::CreatedAt)
            .order_by_asc(message::Column::Id)
            .all(&self.db)
            .await?;

        Ok((b, messages))
    }

    /// Fetch a single message row.
    pub async fn message(&self, id: Uuid) -> Result<message::Model, StoreError> {
        message::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::MessageNotFound)
    }

    /// The oldest `limit` pending rows, ordered by creation time with ties
    /// broken by id.
    pub async fn pending_batch(&self, limit: u64) -> Result<Vec<message::Model>, StoreError> {
        let rows = message::Entity::find()
            .filter(message::Column::Status.eq(MessageStatus::Pending))
            .order_by_asc(message::Column::CreatedAt)
            .order_by_asc(message::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Conditionally transition a row from `from` to `to`, returning whether
    /// the row was in the expected state. With two publishers racing on the
    /// same pending row, exactly one `pending -> queued` transition wins;
    /// the loser sees `false` and skips the row.
    pub async fn transition_status(
        &self,
        id: Uuid,
        from: MessageStatus,
        to: MessageStatus,
    ) -> Result<bool, StoreError> {
        let res = message::Entity::update_many()
            .col_expr(message::Column::Status, Expr::value(to))
            .col_expr(message::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(message::Column::Id.eq(id))
            .filter(message::Column::Status.eq(from))
            .exec(&self.db)
            .await?;

        Ok(res.rows_affected == 1)
    }

    /// Compensating update: put a row back to `pending` after a broker
    /// publish failed. Unconditional; a concurrent publisher re-claiming the
    /// row merely retries the work.
    pub async fn release_to_pending(&self, id: Uuid) -> Result<(), StoreError> {
        message::Entity::update_many()
            .col_expr(message::Column::Status, Expr::value(MessageStatus::Pending))
            .col_expr(message::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(message::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Release rows stranded in `queued` longer than `older_than` back to
    /// `pending`, making them eligible for re-publish. Returns how many rows
    /// were released.
    pub async fn release_stale_queued(&self, older_than: Duration) -> Result<u64, StoreError> {
        let threshold = Utc::now() - older_than;

        let res = message::Entity::update_many()
            .col_expr(message::Column::Status, Expr::value(MessageStatus::Pending))
            .col_expr(message::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(message::Column::Status.eq(MessageStatus::Queued))
            .filter(message::Column::UpdatedAt.lt(threshold))
            .exec(&self.db)
            .await?;

        if res.rows_affected > 0 {
            debug!(released = res.rows_affected, "released stale queued rows");
        }
        Ok(res.rows_affected)
    }

    /// Record the gateway-assigned external id. Write-once: the update is
    /// gated on the column being NULL, so a redelivered message can never
    /// overwrite the id from an earlier accepted submit. Returns whether
    /// this call wrote the id.
    pub async fn set_provider_id(&self, id: Uuid, provider_id: &str) -> Result<bool, StoreError> {
        let res = message::Entity::update_many()
            .col_expr(message::Column::ProviderId, Expr::value(provider_id))
            .col_expr(message::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(message::Column::Id.eq(id))
            .filter(message::Column::ProviderId.is_null())
            .exec(&self.db)
            .await?;

        Ok(res.rows_affected == 1)
    }

    /// Apply a delivery receipt to the row carrying `provider_id`.
    ///
    /// The update matches any non-terminal status (the receipt may race the
    /// worker's `sent` transition), and never a terminal one, which makes
    /// replays no-ops and keeps terminal rows terminal.
    pub async fn apply_dlr(
        &self,
        provider_id: &str,
        status: MessageStatus,
    ) -> Result<DlrApply, StoreError> {
        let res = message::Entity::update_many()
            .col_expr(message::Column::Status, Expr::value(status))
            .col_expr(message::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(message::Column::ProviderId.eq(provider_id))
            .filter(
                message::Column::Status.is_not_in(MessageStatus::TERMINAL.iter().copied()),
            )
            .exec(&self.db)
            .await?;

        if res.rows_affected > 0 {
            return Ok(DlrApply::Applied);
        }

        let exists = message::Entity::find()
            .filter(message::Column::ProviderId.eq(provider_id))
            .one(&self.db)
            .await?
            .is_some();

        Ok(if exists {
            DlrApply::AlreadyTerminal
        } else {
            DlrApply::Unknown
        })
    }
}
