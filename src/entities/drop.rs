//! Drop entity - A piece of content users can unlock with coins.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Drop database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "drops")]
pub struct Model {
    /// Unique identifier for the drop
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Headline
    pub title: String,
    /// Longer description
    pub description: Option<String>,
    /// Service the drop is for (e.g. a streaming platform)
    pub service: Option<String>,
    /// Price in coins
    pub cost: i64,
    /// How many times the drop has been unlocked
    pub unlock_count: i64,
    /// Username of the creator
    pub owner_username: Option<String>,
    /// Account id of the creator
    pub owner_id: Option<i64>,
    /// Hidden drops never show up in the bot
    pub is_visible: bool,
    /// Expired drops never show up in the bot
    pub is_expired: bool,
    /// Publication time
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Drop and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Unlock records for this drop
    #[sea_orm(has_many = "super::unlocked_drop::Entity")]
    UnlockedDrop,
}

impl Related<super::unlocked_drop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UnlockedDrop.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
