//! Community commands - leaderboards, account generator services, and announcements.

use crate::{
    bot::dispatch::{CommandHandler, HandlerContext, Invocation},
    core::{
        announcements::{active_announcements, kind_emoji},
        leaderboard::{LeaderboardCategory, LeaderboardEntry, top_users},
        services::{ServiceAvailability, active_services},
    },
    entities::announcement,
    errors::Result,
    interaction::{Embed, Reply, colours, truncate},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

const ANNOUNCEMENT_PREVIEW_CHARS: usize = 200;

fn rank_marker(index: usize) -> String {
    match index {
        0 => "🥇".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        n => format!("#{}", n + 1),
    }
}

/// Renders the `/leaderboard` reply.
#[must_use]
pub fn render_leaderboard(
    category: LeaderboardCategory,
    entries: &[LeaderboardEntry],
    now: DateTime<Utc>,
) -> Reply {
    if entries.is_empty() {
        return Reply::text("No ranked users yet.");
    }

    let embed = entries.iter().enumerate().fold(
        Embed::new()
            .title(format!("🏆 Top 10 - {}", category.label()))
            .colour(colours::GOLD)
            .timestamp(now),
        |embed, (i, entry)| {
            embed.field(
                format!("{} {}", rank_marker(i), entry.username),
                format!("{} {}", entry.score, category.unit()),
                true,
            )
        },
    );
    Reply::embed(embed)
}

/// Renders the `/services` reply.
#[must_use]
pub fn render_services(services: &[ServiceAvailability], now: DateTime<Utc>) -> Reply {
    if services.is_empty() {
        return Reply::text("No services available at the moment.");
    }

    let embed = services.iter().fold(
        Embed::new()
            .title("🎮 Available Account Services")
            .colour(colours::PURPLE)
            .description("Account generator services currently available")
            .footer("Visit /account-generator to claim accounts!")
            .timestamp(now),
        |embed, service| {
            let value = match service.description.as_deref() {
                Some(description) if !description.trim().is_empty() => {
                    format!("{description}\n📦 Stock: {}", service.available)
                }
                _ => format!("📦 Stock: {}", service.available),
            };
            embed.field(&service.name, value, true)
        },
    );
    Reply::embed(embed)
}

/// Renders the `/announcements` reply.
#[must_use]
pub fn render_announcements(announcements: &[announcement::Model], now: DateTime<Utc>) -> Reply {
    if announcements.is_empty() {
        return Reply::text("No active announcements at the moment.");
    }

    let embed = announcements.iter().fold(
        Embed::new()
            .title("📢 Drops Cloud Announcements")
            .colour(colours::BLUE)
            .timestamp(now),
        |embed, a| {
            embed.field(
                format!("{} {}", kind_emoji(&a.kind), a.title),
                truncate(&a.message, ANNOUNCEMENT_PREVIEW_CHARS),
                false,
            )
        },
    );
    Reply::embed(embed)
}

/// `/leaderboard [category]`
pub struct LeaderboardCommand;

#[async_trait]
impl CommandHandler for LeaderboardCommand {
    fn name(&self) -> &'static str {
        "leaderboard"
    }

    async fn handle(&self, ctx: &HandlerContext<'_>, invocation: &Invocation) -> Result<Reply> {
        let category = invocation.args.category.unwrap_or_default();
        let entries = top_users(ctx.db, category).await?;
        Ok(render_leaderboard(category, &entries, ctx.now))
    }
}

/// `/services`
pub struct ServicesCommand;

#[async_trait]
impl CommandHandler for ServicesCommand {
    fn name(&self) -> &'static str {
        "services"
    }

    async fn handle(&self, ctx: &HandlerContext<'_>, _invocation: &Invocation) -> Result<Reply> {
        let services = active_services(ctx.db).await?;
        Ok(render_services(&services, ctx.now))
    }
}

/// `/announcements`
pub struct AnnouncementsCommand;

#[async_trait]
impl CommandHandler for AnnouncementsCommand {
    fn name(&self) -> &'static str {
        "announcements"
    }

    async fn handle(&self, ctx: &HandlerContext<'_>, _invocation: &Invocation) -> Result<Reply> {
        let announcements = active_announcements(ctx.db, ctx.now).await?;
        Ok(render_announcements(&announcements, ctx.now))
    }
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, dispatch::CommandArgs, invoke},
        core::leaderboard::LeaderboardCategory,
        errors::Result,
    };

    /// Leaderboard categories offered as fixed slash-command choices
    // Kept apart from `LeaderboardCategory` so `core` does not depend on poise.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
    pub enum CategoryChoice {
        #[name = "Coins"]
        Coins,
        #[name = "Drops Created"]
        Drops,
        #[name = "Drops Unlocked"]
        Unlocked,
    }

    impl From<CategoryChoice> for LeaderboardCategory {
        fn from(choice: CategoryChoice) -> Self {
            match choice {
                CategoryChoice::Coins => Self::Coins,
                CategoryChoice::Drops => Self::Drops,
                CategoryChoice::Unlocked => Self::Unlocked,
            }
        }
    }

    /// View top users
    #[poise::command(slash_command)]
    pub async fn leaderboard(
        ctx: Context<'_>,
        #[description = "Leaderboard category"] category: Option<CategoryChoice>,
    ) -> Result<()> {
        let args = CommandArgs {
            category: category.map(Into::into),
            ..CommandArgs::default()
        };
        invoke(ctx, args).await
    }

    /// View available account generator services
    #[poise::command(slash_command)]
    pub async fn services(ctx: Context<'_>) -> Result<()> {
        invoke(ctx, CommandArgs::default()).await
    }

    /// View the latest Drops Cloud announcements
    #[poise::command(slash_command)]
    pub async fn announcements(ctx: Context<'_>) -> Result<()> {
        invoke(ctx, CommandArgs::default()).await
    }
}

pub use inner::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bot::dispatch::CommandArgs,
        config::Settings,
        test_utils::{discord_user, invocation, setup_test_db, test_announcement, test_user},
    };
    use sea_orm::{ActiveModelTrait, Set};

    #[test]
    fn test_rank_markers() {
        assert_eq!(rank_marker(0), "🥇");
        assert_eq!(rank_marker(2), "🥉");
        assert_eq!(rank_marker(3), "#4");
        assert_eq!(rank_marker(9), "#10");
    }

    #[test]
    fn test_choice_maps_to_category() {
        assert_eq!(
            LeaderboardCategory::from(CategoryChoice::Unlocked),
            LeaderboardCategory::Unlocked
        );
    }

    #[tokio::test]
    async fn test_leaderboard_defaults_to_coins() -> Result<()> {
        let db = setup_test_db().await?;
        for (name, coins) in [("alice", 10), ("bob", 30)] {
            let mut u = test_user(name);
            u.coin_balance = Set(coins);
            u.insert(&db).await?;
        }
        let settings = Settings::default();
        let ctx = HandlerContext {
            db: &db,
            settings: &settings,
            now: Utc::now(),
        };

        let reply = LeaderboardCommand
            .handle(
                &ctx,
                &invocation("leaderboard", discord_user(1, "alice"), CommandArgs::default()),
            )
            .await?;

        let embed = &reply.embeds[0];
        assert_eq!(embed.title.as_deref(), Some("🏆 Top 10 - Coins"));
        assert_eq!(embed.fields[0].name, "🥇 bob");
        assert_eq!(embed.fields[0].value, "30 coins");
        assert_eq!(embed.fields[1].name, "🥈 alice");
        Ok(())
    }

    #[test]
    fn test_services_show_stock() {
        let services = vec![ServiceAvailability {
            name: "Netflix".to_string(),
            description: None,
            available: 4,
        }];
        let reply = render_services(&services, Utc::now());
        assert_eq!(reply.embeds[0].field_value("Netflix"), Some("📦 Stock: 4"));

        let empty = render_services(&[], Utc::now());
        assert_eq!(
            empty.content.as_deref(),
            Some("No services available at the moment.")
        );
    }

    #[tokio::test]
    async fn test_announcements_truncate_long_messages() -> Result<()> {
        let db = setup_test_db().await?;
        let mut a = test_announcement("Maintenance");
        a.kind = Set("warning".to_string());
        a.message = Set("y".repeat(250));
        a.insert(&db).await?;
        let settings = Settings::default();
        let ctx = HandlerContext {
            db: &db,
            settings: &settings,
            now: Utc::now(),
        };

        let reply = AnnouncementsCommand
            .handle(
                &ctx,
                &invocation("announcements", discord_user(1, "alice"), CommandArgs::default()),
            )
            .await?;

        let field = &reply.embeds[0].fields[0];
        assert_eq!(field.name, "⚠️ Maintenance");
        assert_eq!(field.value.chars().count(), 203);
        Ok(())
    }
}
