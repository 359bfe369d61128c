//! Daily coin bonus.
//!
//! The check ("not yet claimed today") and the credit happen in one database
//! transaction. The check is a conditional `UPDATE` on `user_stats`, so two
//! concurrent claims for the same day cannot both succeed.

use crate::{
    core::users::require_linked,
    entities::{User, UserStats, user, user_stats},
    errors::{Error, LinkSubject, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    Condition, Set, TransactionTrait,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use tracing::{info, instrument};

/// Outcome of a successful claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyClaim {
    /// Display name of the claiming account
    pub username: String,
    /// Coins credited
    pub bonus: i64,
    /// Balance after the credit
    pub new_balance: i64,
    /// Successful claims so far, including this one
    pub total_claims: i64,
}

/// Credits `bonus` coins to the account linked to `discord_id`, at most once per `today`.
///
/// # Errors
/// - [`Error::NotLinked`] if no account is linked to `discord_id`
/// - [`Error::AlreadyClaimed`] if a claim already exists for `today`
/// - [`Error::Database`] on query failure; nothing is credited in that case
#[instrument(skip(db))]
pub async fn claim_daily_bonus(
    db: &DatabaseConnection,
    discord_id: &str,
    bonus: i64,
    today: NaiveDate,
) -> Result<DailyClaim> {
    let account = require_linked(db, discord_id, LinkSubject::Invoker).await?;

    // Open with a write so SQLite takes the write lock before any read.
    let txn = db.begin().await?;

    UserStats::insert(user_stats::ActiveModel {
        user_id: Set(account.id),
        last_bonus_claimed_date: Set(None),
        total_bonuses_claimed: Set(0),
    })
    .on_conflict(
        OnConflict::column(user_stats::Column::UserId)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(&txn)
    .await?;

    let claimed = UserStats::update_many()
        .col_expr(user_stats::Column::LastBonusClaimedDate, Expr::value(today))
        .col_expr(
            user_stats::Column::TotalBonusesClaimed,
            Expr::col(user_stats::Column::TotalBonusesClaimed).add(1),
        )
        .filter(user_stats::Column::UserId.eq(account.id))
        .filter(
            Condition::any()
                .add(user_stats::Column::LastBonusClaimedDate.is_null())
                .add(user_stats::Column::LastBonusClaimedDate.ne(today)),
        )
        .exec(&txn)
        .await?;

    if claimed.rows_affected == 0 {
        // Dropping the transaction rolls back the no-op insert.
        return Err(Error::AlreadyClaimed { date: today });
    }

    User::update_many()
        .col_expr(
            user::Column::CoinBalance,
            Expr::col(user::Column::CoinBalance).add(bonus),
        )
        .filter(user::Column::Id.eq(account.id))
        .exec(&txn)
        .await?;

    let new_balance = User::find_by_id(account.id)
        .one(&txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("user {}", account.id)))?
        .coin_balance;
    let total_claims = UserStats::find_by_id(account.id)
        .one(&txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("user_stats {}", account.id)))?
        .total_bonuses_claimed;

    txn.commit().await?;

    info!(
        user = %account.username,
        bonus,
        new_balance,
        "Daily bonus claimed"
    );

    Ok(DailyClaim {
        username: account.username,
        bonus,
        new_balance,
        total_claims,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        config::database::{create_connection, create_tables},
        test_utils::{linked_user, setup_test_db},
    };
    use chrono::Utc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap_or_default()
    }

    #[tokio::test]
    async fn test_first_claim_credits_bonus() -> Result<()> {
        let db = setup_test_db().await?;
        linked_user(&db, "alice", "100", 20).await?;

        let claim = claim_daily_bonus(&db, "100", 50, day(1)).await?;
        assert_eq!(claim.username, "alice");
        assert_eq!(claim.bonus, 50);
        assert_eq!(claim.new_balance, 70);
        assert_eq!(claim.total_claims, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_second_claim_same_day_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = linked_user(&db, "alice", "100", 0).await?;

        claim_daily_bonus(&db, "100", 50, day(1)).await?;
        let second = claim_daily_bonus(&db, "100", 50, day(1)).await;
        assert!(matches!(second, Err(Error::AlreadyClaimed { date }) if date == day(1)));

        let balance = User::find_by_id(alice.id)
            .one(&db)
            .await?
            .map(|u| u.coin_balance);
        assert_eq!(balance, Some(50));
        Ok(())
    }

    #[tokio::test]
    async fn test_claim_next_day_succeeds() -> Result<()> {
        let db = setup_test_db().await?;
        linked_user(&db, "alice", "100", 0).await?;

        claim_daily_bonus(&db, "100", 50, day(1)).await?;
        let claim = claim_daily_bonus(&db, "100", 75, day(2)).await?;
        assert_eq!(claim.new_balance, 125);
        assert_eq!(claim.total_claims, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_claims_are_per_user() -> Result<()> {
        let db = setup_test_db().await?;
        linked_user(&db, "alice", "100", 0).await?;
        linked_user(&db, "bob", "200", 0).await?;

        claim_daily_bonus(&db, "100", 50, day(1)).await?;
        let bob = claim_daily_bonus(&db, "200", 50, day(1)).await?;
        assert_eq!(bob.new_balance, 50);
        Ok(())
    }

    #[tokio::test]
    async fn test_unlinked_user_cannot_claim() -> Result<()> {
        let db = setup_test_db().await?;

        let result = claim_daily_bonus(&db, "404", 50, day(1)).await;
        assert!(matches!(
            result,
            Err(Error::NotLinked {
                subject: LinkSubject::Invoker,
                ..
            })
        ));
        assert!(UserStats::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_claims_credit_once() -> Result<()> {
        const CLAIMS: usize = 8;

        // A file database so the pool holds several real connections.
        let path = std::env::temp_dir().join(format!(
            "drops_cloud_daily_{}_{}.sqlite",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let db = create_connection(&format!("sqlite://{}?mode=rwc", path.display())).await?;
        create_tables(&db).await?;
        let alice = linked_user(&db, "alice", "100", 0).await?;
        // `DatabaseConnection` is not `Clone` under sea-orm's `mock` feature.
        let db = std::sync::Arc::new(db);

        let handles: Vec<_> = (0..CLAIMS)
            .map(|_| {
                let db = std::sync::Arc::clone(&db);
                tokio::spawn(async move { claim_daily_bonus(&db, "100", 50, day(1)).await })
            })
            .collect();

        let mut succeeded = 0;
        let mut already_claimed = 0;
        let mut other = Vec::new();
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(Error::AlreadyClaimed { .. }) => already_claimed += 1,
                Err(e) => other.push(e.to_string()),
            }
        }

        let db = std::sync::Arc::try_unwrap(db).expect("all claim tasks joined");
        let balance = User::find_by_id(alice.id)
            .one(&db)
            .await?
            .map(|u| u.coin_balance);
        let claims = UserStats::find_by_id(alice.id)
            .one(&db)
            .await?
            .map(|s| s.total_bonuses_claimed);
        db.close().await?;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }

        assert_eq!(other, Vec::<String>::new());
        assert_eq!(succeeded, 1);
        assert_eq!(already_claimed, CLAIMS - 1);
        assert_eq!(balance, Some(50));
        assert_eq!(claims, Some(1));
        Ok(())
    }
}
