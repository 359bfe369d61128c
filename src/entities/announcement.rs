//! Announcement entity - Site-wide notices, also surfaced by `/announcements`.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Announcement database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "announcements")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
    /// `"info"`, `"warning"`, `"success"` or `"error"`
    #[sea_orm(column_name = "type")]
    pub kind: String,
    /// Inactive announcements are hidden
    pub is_active: bool,
    /// Hidden after this time when set
    pub expires_at: Option<DateTimeUtc>,
    /// Publication time
    pub created_at: DateTimeUtc,
}

/// `Announcement` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
