//! Site announcements shown by `/announcements`.

use crate::{
    entities::{Announcement, announcement},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{Condition, QueryOrder, QuerySelect, prelude::*};
use tracing::instrument;

/// Number of announcements shown.
pub const ANNOUNCEMENT_LIMIT: u64 = 3;

/// Active announcements that have not expired at `now`, newest first.
#[instrument(skip(db))]
pub async fn active_announcements(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
) -> Result<Vec<announcement::Model>> {
    Announcement::find()
        .filter(announcement::Column::IsActive.eq(true))
        .filter(
            Condition::any()
                .add(announcement::Column::ExpiresAt.is_null())
                .add(announcement::Column::ExpiresAt.gt(now)),
        )
        .order_by_desc(announcement::Column::CreatedAt)
        .limit(ANNOUNCEMENT_LIMIT)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Emoji prefix for an announcement kind.
#[must_use]
pub fn kind_emoji(kind: &str) -> &'static str {
    match kind {
        "info" => "ℹ️",
        "warning" => "⚠️",
        "success" => "✅",
        "error" => "❌",
        _ => "📌",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_test_db, test_announcement};
    use chrono::Duration;
    use sea_orm::{ActiveModelTrait, Set};

    #[tokio::test]
    async fn test_active_announcements_filters_and_limits() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();

        for i in 0..4 {
            let mut a = test_announcement(&format!("news {i}"));
            a.created_at = Set(now - Duration::hours(i));
            a.insert(&db).await?;
        }
        let mut inactive = test_announcement("inactive");
        inactive.is_active = Set(false);
        inactive.insert(&db).await?;
        let mut expired = test_announcement("expired");
        expired.expires_at = Set(Some(now - Duration::minutes(5)));
        expired.created_at = Set(now + Duration::hours(1));
        expired.insert(&db).await?;
        let mut upcoming_expiry = test_announcement("still running");
        upcoming_expiry.expires_at = Set(Some(now + Duration::days(1)));
        upcoming_expiry.created_at = Set(now + Duration::minutes(30));
        upcoming_expiry.insert(&db).await?;

        let shown = active_announcements(&db, now).await?;
        let titles: Vec<_> = shown.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["still running", "news 0", "news 1"]);
        Ok(())
    }

    #[test]
    fn test_kind_emoji_falls_back_to_pin() {
        assert_eq!(kind_emoji("warning"), "⚠️");
        assert_eq!(kind_emoji("maintenance"), "📌");
    }
}
