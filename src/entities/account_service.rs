//! Account service entity - A service for which account stock is sold.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account service database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account_services")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Internal name
    pub service_name: String,
    /// Name shown to users; falls back to `service_name`
    pub display_name: Option<String>,
    /// Short description
    pub description: Option<String>,
    /// Inactive services are hidden
    pub is_active: bool,
}

/// Defines relationships between `AccountService` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Stock items for this service
    #[sea_orm(has_many = "super::account_stock::Entity")]
    AccountStock,
}

impl Related<super::account_stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountStock.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
