//! Account generator services and their available stock.

use crate::{
    entities::{AccountService, AccountStock, account_service, account_stock},
    errors::Result,
};
use sea_orm::{QueryOrder, QuerySelect, prelude::*, sea_query::Expr};
use std::collections::HashMap;
use tracing::instrument;

/// Number of services shown.
pub const SERVICE_LIST_LIMIT: u64 = 15;

/// A service together with its count of available stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAvailability {
    /// Display name, or the internal name when none is set
    pub name: String,
    /// Short description
    pub description: Option<String>,
    /// Stock items with status `available`
    pub available: i64,
}

/// Active services ordered by display name, each with its available stock.
#[instrument(skip(db))]
pub async fn active_services(db: &DatabaseConnection) -> Result<Vec<ServiceAvailability>> {
    let services = AccountService::find()
        .filter(account_service::Column::IsActive.eq(true))
        .order_by_asc(account_service::Column::DisplayName)
        .order_by_asc(account_service::Column::ServiceName)
        .limit(SERVICE_LIST_LIMIT)
        .all(db)
        .await?;

    if services.is_empty() {
        return Ok(Vec::new());
    }

    let counts: HashMap<i64, i64> = AccountStock::find()
        .select_only()
        .column(account_stock::Column::ServiceId)
        .column_as(
            Expr::col((AccountStock, account_stock::Column::Id)).count(),
            "available",
        )
        .filter(account_stock::Column::Status.eq(account_stock::STATUS_AVAILABLE))
        .filter(account_stock::Column::ServiceId.is_in(services.iter().map(|s| s.id)))
        .group_by(account_stock::Column::ServiceId)
        .into_tuple::<(i64, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    Ok(services
        .into_iter()
        .map(|service| ServiceAvailability {
            available: counts.get(&service.id).copied().unwrap_or(0),
            name: service.display_name.unwrap_or(service.service_name),
            description: service.description,
        })
        .collect())
}
