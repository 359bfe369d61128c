//! Account lookup by Discord identity and VIP status.

use crate::{
    entities::{User, user},
    errors::{Error, LinkSubject, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::prelude::*;
use tracing::instrument;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Finds the account linked to `discord_id`, if any.
#[instrument(skip(db))]
pub async fn find_by_discord_id<C>(db: &C, discord_id: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::DiscordId.eq(discord_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`find_by_discord_id`] but turns a missing account into [`Error::NotLinked`].
pub async fn require_linked<C>(db: &C, discord_id: &str, subject: LinkSubject) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    find_by_discord_id(db, discord_id)
        .await?
        .ok_or_else(|| Error::NotLinked {
            discord_id: discord_id.to_string(),
            subject,
        })
}

/// VIP membership state at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VipStatus {
    /// Membership runs until `expires_at`
    Active {
        /// End of the membership
        expires_at: DateTime<Utc>,
        /// Whole days left, rounded up
        days_remaining: i64,
    },
    /// No membership, or it has lapsed
    Inactive,
}

impl VipStatus {
    /// Returns true for [`VipStatus::Active`].
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

/// Computes the VIP status of `user` at `now`. Membership is active while `vip_expires_at > now`.
#[must_use]
pub fn vip_status(user: &user::Model, now: DateTime<Utc>) -> VipStatus {
    match user.vip_expires_at {
        Some(expires_at) if expires_at > now => {
            let seconds = (expires_at - now).num_seconds();
            VipStatus::Active {
                expires_at,
                days_remaining: (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY,
            }
        }
        _ => VipStatus::Inactive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_test_db, test_user};
    use chrono::Duration;
    use sea_orm::{ActiveModelTrait, Set};

    #[tokio::test]
    async fn test_find_by_discord_id() -> Result<()> {
        let db = setup_test_db().await?;
        let mut alice = test_user("alice");
        alice.discord_id = Set(Some("111".to_string()));
        alice.insert(&db).await?;
        test_user("bob").insert(&db).await?;

        let found = find_by_discord_id(&db, "111").await?;
        assert_eq!(found.map(|u| u.username), Some("alice".to_string()));
        assert!(find_by_discord_id(&db, "999").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_require_linked_reports_subject() -> Result<()> {
        let db = setup_test_db().await?;

        let err = require_linked(
            &db,
            "42",
            LinkSubject::Other {
                name: "carol".to_string(),
            },
        )
        .await;

        match err {
            Err(Error::NotLinked {
                discord_id,
                subject: LinkSubject::Other { name },
            }) => {
                assert_eq!(discord_id, "42");
                assert_eq!(name, "carol");
            }
            other => panic!("expected NotLinked, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_vip_status_rounds_days_up() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        let mut vip = test_user("vip");
        vip.vip_expires_at = Set(Some(now + Duration::days(2) + Duration::hours(1)));
        let vip = vip.insert(&db).await?;

        match vip_status(&vip, now) {
            VipStatus::Active { days_remaining, .. } => assert_eq!(days_remaining, 3),
            VipStatus::Inactive => panic!("expected active VIP"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_vip_status_expired_or_missing_is_inactive() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        let mut lapsed = test_user("lapsed");
        lapsed.vip_expires_at = Set(Some(now - Duration::minutes(1)));
        let lapsed = lapsed.insert(&db).await?;
        let plain = test_user("plain").insert(&db).await?;

        assert_eq!(vip_status(&lapsed, now), VipStatus::Inactive);
        assert_eq!(vip_status(&plain, now), VipStatus::Inactive);
        assert!(!vip_status(&plain, now).is_active());
        Ok(())
    }
}
