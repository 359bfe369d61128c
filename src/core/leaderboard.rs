//! User rankings.
//!
//! The ranking column comes from the closed [`LeaderboardCategory`] enum, so no
//! caller-provided text ever reaches the `ORDER BY` clause.

use crate::{
    entities::{UnlockedDrop, User, unlocked_drop, user},
    errors::Result,
};
use sea_orm::{FromQueryResult, QueryOrder, QuerySelect, prelude::*, sea_query::Expr};
use std::fmt;
use tracing::instrument;

/// Number of users shown on a leaderboard.
pub const LEADERBOARD_LIMIT: u64 = 10;

/// Only accounts with this status are ranked.
const ACTIVE_STATUS: &str = "active";

/// What users are ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaderboardCategory {
    /// Current coin balance
    #[default]
    Coins,
    /// Number of drops published
    Drops,
    /// Number of drops unlocked
    Unlocked,
}

impl LeaderboardCategory {
    /// Heading used in the leaderboard title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Coins => "Coins",
            Self::Drops => "Drops Created",
            Self::Unlocked => "Drops Unlocked",
        }
    }

    /// Unit appended to each score.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Coins => "coins",
            Self::Drops => "drops",
            Self::Unlocked => "unlocked",
        }
    }
}

impl fmt::Display for LeaderboardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One ranked user.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct LeaderboardEntry {
    /// Display name
    pub username: String,
    /// Account role
    pub role: String,
    /// Value of the ranking column
    pub score: i64,
}

/// Top active users for `category`, highest score first, ties broken by username.
#[instrument(skip(db))]
pub async fn top_users(
    db: &DatabaseConnection,
    category: LeaderboardCategory,
) -> Result<Vec<LeaderboardEntry>> {
    let base = User::find()
        .select_only()
        .column(user::Column::Username)
        .column(user::Column::Role)
        .filter(user::Column::Status.eq(ACTIVE_STATUS));

    let unlock_count = || Expr::col((UnlockedDrop, unlocked_drop::Column::Id)).count();

    let ranked = match category {
        LeaderboardCategory::Coins => base
            .column_as(user::Column::CoinBalance, "score")
            .order_by_desc(user::Column::CoinBalance),
        LeaderboardCategory::Drops => base
            .column_as(user::Column::TotalDropsCreated, "score")
            .order_by_desc(user::Column::TotalDropsCreated),
        LeaderboardCategory::Unlocked => base
            .column_as(unlock_count(), "score")
            .left_join(UnlockedDrop)
            .group_by(user::Column::Id)
            .group_by(user::Column::Username)
            .group_by(user::Column::Role)
            .order_by_desc(unlock_count()),
    };

    ranked
        .order_by_asc(user::Column::Username)
        .limit(LEADERBOARD_LIMIT)
        .into_model::<LeaderboardEntry>()
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_test_db, test_drop, test_user};
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, Set};

    #[tokio::test]
    async fn test_coins_leaderboard_excludes_inactive_users() -> Result<()> {
        let db = setup_test_db().await?;
        for (name, coins, status) in [
            ("rich", 900, "active"),
            ("banned", 5000, "banned"),
            ("poor", 10, "active"),
        ] {
            let mut u = test_user(name);
            u.coin_balance = Set(coins);
            u.status = Set(status.to_string());
            u.insert(&db).await?;
        }

        let entries = top_users(&db, LeaderboardCategory::Coins).await?;
        let names: Vec<_> = entries.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["rich", "poor"]);
        assert_eq!(entries[0].score, 900);
        Ok(())
    }

    #[tokio::test]
    async fn test_drops_leaderboard_breaks_ties_by_name() -> Result<()> {
        let db = setup_test_db().await?;
        for (name, created) in [("zed", 3), ("amy", 3), ("max", 7)] {
            let mut u = test_user(name);
            u.total_drops_created = Set(created);
            u.insert(&db).await?;
        }

        let entries = top_users(&db, LeaderboardCategory::Drops).await?;
        let names: Vec<_> = entries.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["max", "amy", "zed"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_unlocked_leaderboard_counts_unlocks() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = test_user("alice").insert(&db).await?;
        let bob = test_user("bob").insert(&db).await?;
        test_user("carol").insert(&db).await?;
        let first = test_drop("first").insert(&db).await?;
        let second = test_drop("second").insert(&db).await?;

        for (user_id, drop_id) in [(bob.id, first.id), (bob.id, second.id), (alice.id, first.id)] {
            unlocked_drop::ActiveModel {
                user_id: Set(user_id),
                drop_id: Set(drop_id),
                unlocked_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&db)
            .await?;
        }

        let entries = top_users(&db, LeaderboardCategory::Unlocked).await?;
        let ranked: Vec<_> = entries
            .iter()
            .map(|e| (e.username.as_str(), e.score))
            .collect();
        assert_eq!(ranked, vec![("bob", 2), ("alice", 1), ("carol", 0)]);
        Ok(())
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(LeaderboardCategory::default(), LeaderboardCategory::Coins);
        assert_eq!(LeaderboardCategory::Unlocked.to_string(), "Drops Unlocked");
        assert_eq!(LeaderboardCategory::Drops.unit(), "drops");
    }
}
