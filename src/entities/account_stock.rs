//! Account stock entity - One sellable account of a service.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stock status for items that can still be bought.
pub const STATUS_AVAILABLE: &str = "available";

/// Account stock database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account_stock")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Service this item belongs to
    pub service_id: i64,
    /// `"available"`, `"sold"`, ...
    pub status: String,
}

/// Each stock item belongs to one service
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The owning service
    #[sea_orm(
        belongs_to = "super::account_service::Entity",
        from = "Column::ServiceId",
        to = "super::account_service::Column::Id"
    )]
    AccountService,
}

impl Related<super::account_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountService.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
