//! Unlocked drop entity - Records that a user paid to unlock a drop.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Unlock record
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "unlocked_drops")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Account that unlocked the drop
    pub user_id: i64,
    /// Drop that was unlocked
    pub drop_id: i64,
    /// When the unlock happened
    pub unlocked_at: DateTimeUtc,
}

/// Each unlock belongs to one user and one drop
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The unlocking account
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// The unlocked drop
    #[sea_orm(
        belongs_to = "super::drop::Entity",
        from = "Column::DropId",
        to = "super::drop::Column::Id"
    )]
    Drop,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::drop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Drop.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
