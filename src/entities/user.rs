//! User entity - A Drops Cloud account.
//!
//! `discord_id` is set once the account has been linked through the website;
//! every bot command that reads "your" data looks the account up by it.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name on Drops Cloud
    pub username: String,
    /// Linked Discord user id (snowflake as text)
    #[sea_orm(unique)]
    pub discord_id: Option<String>,
    /// Avatar URL
    pub profile_picture: Option<String>,
    /// Spendable coins
    pub coin_balance: i64,
    /// Lifetime coins earned
    pub total_coins_earned: i64,
    /// Number of drops this user has published
    pub total_drops_created: i64,
    /// Creator career tier, if any
    pub career_tier: Option<String>,
    /// Account role, e.g. `"user"`, `"vip"`, `"admin"`
    pub role: String,
    /// Account status; only `"active"` users appear on leaderboards
    pub status: String,
    /// Free-form profile text
    pub bio: Option<String>,
    /// End of the current VIP period
    pub vip_expires_at: Option<DateTimeUtc>,
    /// Start of the current VIP period
    pub vip_granted_at: Option<DateTimeUtc>,
    /// Badge colour chosen by the VIP
    pub vip_badge_color: Option<String>,
    /// Account creation time
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Drops this user has unlocked
    #[sea_orm(has_many = "super::unlocked_drop::Entity")]
    UnlockedDrop,
}

impl Related<super::unlocked_drop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UnlockedDrop.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
