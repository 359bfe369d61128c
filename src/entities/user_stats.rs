//! User stats entity - Per-user daily bonus bookkeeping.
//!
//! Rows are created lazily on the first `/daily` claim.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User stats database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_stats")]
pub struct Model {
    /// Account id; one row per user
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    /// UTC calendar day of the last successful claim
    pub last_bonus_claimed_date: Option<Date>,
    /// Number of successful claims
    pub total_bonuses_claimed: i64,
}

/// Each stats row belongs to one user
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The owning account
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
