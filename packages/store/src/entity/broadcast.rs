use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An immutable grouping record: one row per intake request.
/// Never mutated or deleted by the pipeline.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "broadcasts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::message::Entity")]
    Message,
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Message.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&common::Broadcast> for ActiveModel {
    fn from(b: &common::Broadcast) -> Self {
        use sea_orm::Set;
        Self {
            id: Set(b.id),
            name: Set(b.name.clone()),
            created_at: Set(b.created_at),
        }
    }
}
