//! Drop listings and search.
//!
//! Only drops that are visible and not expired are ever returned.

use crate::{
    entities::{Drop, drop},
    errors::{Error, Result},
};
use sea_orm::{
    Condition, QueryOrder, QuerySelect,
    prelude::*,
    sea_query::{Expr, Func, LikeExpr},
};
use tracing::instrument;

/// Number of drops shown by the listing commands.
pub const DROP_LIST_LIMIT: u64 = 5;

fn listed() -> Condition {
    Condition::all()
        .add(drop::Column::IsVisible.eq(true))
        .add(drop::Column::IsExpired.eq(false))
}

/// Latest listed drops, newest first.
#[instrument(skip(db))]
pub async fn latest_drops(db: &DatabaseConnection) -> Result<Vec<drop::Model>> {
    Drop::find()
        .filter(listed())
        .order_by_desc(drop::Column::CreatedAt)
        .limit(DROP_LIST_LIMIT)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Most unlocked listed drops.
#[instrument(skip(db))]
pub async fn top_drops(db: &DatabaseConnection) -> Result<Vec<drop::Model>> {
    Drop::find()
        .filter(listed())
        .order_by_desc(drop::Column::UnlockCount)
        .order_by_desc(drop::Column::CreatedAt)
        .limit(DROP_LIST_LIMIT)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Escapes `LIKE` wildcards so user input only ever matches literally.
#[must_use]
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring search over title, description and service.
///
/// # Errors
/// Returns [`Error::InvalidInput`] for a blank query.
#[instrument(skip(db))]
pub async fn search_drops(db: &DatabaseConnection, query: &str) -> Result<Vec<drop::Model>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::InvalidInput {
            message: "Search query cannot be empty.".to_string(),
        });
    }

    let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
    let matches = |column: drop::Column| {
        Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern.clone()).escape('\\'))
    };

    Drop::find()
        .filter(listed())
        .filter(
            Condition::any()
                .add(matches(drop::Column::Title))
                .add(matches(drop::Column::Description))
                .add(matches(drop::Column::Service)),
        )
        .order_by_desc(drop::Column::CreatedAt)
        .limit(DROP_LIST_LIMIT)
        .all(db)
        .await
        .map_err(Into::into)
}
