use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema,
    sea_query::{Index, PostgresQueryBuilder},
};
use tracing::{info, warn};

use crate::entity::{broadcast, message};

/// Open a connection pool with bounded size and lifetimes, so a burst of
/// concurrent calls queues instead of growing without limit.
pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    opt.max_connections(25)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(60))
        .max_lifetime(Duration::from_secs(300))
        .sqlx_logging(false);

    Database::connect(opt).await
}

/// Create the tables and indexes if they do not exist. Safe to run on every
/// startup, in any process order.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut broadcasts = schema.create_table_from_entity(broadcast::Entity);
    db.execute(builder.build(broadcasts.if_not_exists())).await?;

    let mut messages = schema.create_table_from_entity(message::Entity);
    db.execute(builder.build(messages.if_not_exists())).await?;

    ensure_indexes(db).await;
    Ok(())
}

/// The publisher's batch selection, the DLR lookup, and the broadcast
/// read-back each lean on one of these.
async fn ensure_indexes(db: &DatabaseConnection) {
    let stmts = [
        Index::create()
            .if_not_exists()
            .name("idx_messages_status_created")
            .table(message::Entity)
            .col(message::Column::Status)
            .col(message::Column::CreatedAt)
            .to_string(PostgresQueryBuilder),
        Index::create()
            .if_not_exists()
            .name("idx_messages_broadcast")
            .table(message::Entity)
            .col(message::Column::BroadcastId)
            .to_string(PostgresQueryBuilder),
        // Partial index; sea_query's index builder has no WHERE clause.
        "CREATE INDEX IF NOT EXISTS idx_messages_provider_id \
         ON \"messages\" (\"provider_id\") WHERE \"provider_id\" IS NOT NULL"
            .to_string(),
    ];

    for stmt in stmts {
        if let Err(e) = db.execute_unprepared(&stmt).await {
            warn!(error = %e, "Failed to ensure index");
        }
    }

    info!("Ensured message indexes exist");
}
