use common::{MessageStatus, SmsMessage};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One recipient message moving through the outbox pipeline.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub broadcast_id: Uuid,

    /// Destination address; opaque to the pipeline.
    #[sea_orm(column_name = "to_number", column_type = "Text")]
    pub to: String,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    pub status: MessageStatus,

    /// External id assigned by the gateway. Written once, never overwritten.
    #[sea_orm(column_type = "Text", nullable)]
    pub provider_id: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::broadcast::Entity",
        from = "Column::BroadcastId",
        to = "super::broadcast::Column::Id",
        on_delete = "Cascade"
    )]
    Broadcast,
}

impl Related<super::broadcast::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Broadcast.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SmsMessage {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            broadcast_id: m.broadcast_id,
            to: m.to,
            body: m.body,
            status: m.status,
            provider_id: m.provider_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<&SmsMessage> for ActiveModel {
    fn from(m: &SmsMessage) -> Self {
        use sea_orm::Set;
        Self {
            id: Set(m.id),
            broadcast_id: Set(m.broadcast_id),
            to: Set(m.to.clone()),
            body: Set(m.body.clone()),
            status: Set(m.status),
            provider_id: Set(m.provider_id.clone()),
            created_at: Set(m.created_at),
            updated_at: Set(m.updated_at),
        }
    }
}
