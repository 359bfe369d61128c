//! Drop listing commands - latest drops, search, and the most unlocked drops.

use crate::{
    bot::dispatch::{CommandHandler, HandlerContext, Invocation},
    core::drops as drop_queries,
    entities::drop,
    errors::Result,
    interaction::{Embed, Reply, colours, truncate},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

const DESCRIPTION_PREVIEW_CHARS: usize = 80;
const QUERY_ECHO_CHARS: usize = 100;
const RANK_MARKERS: [&str; 5] = ["🥇", "🥈", "🥉", "4️⃣", "5️⃣"];

fn title_or_placeholder(drop: &drop::Model) -> &str {
    if drop.title.trim().is_empty() {
        "Untitled Drop"
    } else {
        &drop.title
    }
}

fn owner(drop: &drop::Model) -> &str {
    drop.owner_username.as_deref().unwrap_or("Unknown")
}

fn service(drop: &drop::Model) -> &str {
    drop.service.as_deref().unwrap_or("General")
}

/// Renders the `/drops` reply.
#[must_use]
pub fn render_latest(drops: &[drop::Model], now: DateTime<Utc>) -> Reply {
    if drops.is_empty() {
        return Reply::text("No active drops found at the moment.");
    }

    let embed = drops.iter().fold(
        Embed::new()
            .title("📦 Latest Drops on Drops Cloud")
            .colour(colours::PURPLE)
            .description("Here are the newest drops available")
            .footer("Visit Drops Cloud to unlock these drops!")
            .timestamp(now),
        |embed, d| {
            let description = d
                .description
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map_or_else(
                    || "No description".to_string(),
                    |s| truncate(s, DESCRIPTION_PREVIEW_CHARS),
                );
            embed.field(
                title_or_placeholder(d),
                format!(
                    "💰 {} coins | 🔓 {} unlocks\n👤 {} | 🎮 {}\n{description}",
                    d.cost,
                    d.unlock_count,
                    owner(d),
                    service(d)
                ),
                false,
            )
        },
    );
    Reply::embed(embed)
}

/// Renders the `/search` reply for the (trimmed) `query`.
#[must_use]
pub fn render_search(query: &str, drops: &[drop::Model], now: DateTime<Utc>) -> Reply {
    let query = truncate(query, QUERY_ECHO_CHARS);
    if drops.is_empty() {
        return Reply::text(format!("No drops found for \"{query}\"."));
    }

    let embed = drops.iter().fold(
        Embed::new()
            .title(format!("🔍 Search Results for \"{query}\""))
            .colour(colours::PURPLE)
            .description(format!("Found {} result(s)", drops.len()))
            .timestamp(now),
        |embed, d| {
            embed.field(
                title_or_placeholder(d),
                format!(
                    "💰 {} coins | 🔓 {} unlocks | 👤 {}",
                    d.cost,
                    d.unlock_count,
                    owner(d)
                ),
                false,
            )
        },
    );
    Reply::embed(embed)
}

/// Renders the `/top` reply.
#[must_use]
pub fn render_top(drops: &[drop::Model], now: DateTime<Utc>) -> Reply {
    if drops.is_empty() {
        return Reply::text("No drops found.");
    }

    let embed = drops.iter().zip(RANK_MARKERS).fold(
        Embed::new()
            .title("🏆 Top Drops by Unlocks")
            .colour(colours::GOLD)
            .description("Most popular drops on Drops Cloud")
            .timestamp(now),
        |embed, (d, marker)| {
            embed.field(
                format!("{marker} {}", title_or_placeholder(d)),
                format!(
                    "🔓 {} unlocks | 💰 {} coins\n👤 {} | 🎮 {}",
                    d.unlock_count,
                    d.cost,
                    owner(d),
                    service(d)
                ),
                false,
            )
        },
    );
    Reply::embed(embed)
}

/// `/drops`
pub struct DropsCommand;

#[async_trait]
impl CommandHandler for DropsCommand {
    fn name(&self) -> &'static str {
        "drops"
    }

    async fn handle(&self, ctx: &HandlerContext<'_>, _invocation: &Invocation) -> Result<Reply> {
        let drops = drop_queries::latest_drops(ctx.db).await?;
        Ok(render_latest(&drops, ctx.now))
    }
}

/// `/search query`
pub struct SearchCommand;

#[async_trait]
impl CommandHandler for SearchCommand {
    fn name(&self) -> &'static str {
        "search"
    }

    async fn handle(&self, ctx: &HandlerContext<'_>, invocation: &Invocation) -> Result<Reply> {
        let query = invocation.args.query.as_deref().unwrap_or_default().trim();
        let drops = drop_queries::search_drops(ctx.db, query).await?;
        Ok(render_search(query, &drops, ctx.now))
    }
}

/// `/top`
pub struct TopCommand;

#[async_trait]
impl CommandHandler for TopCommand {
    fn name(&self) -> &'static str {
        "top"
    }

    async fn handle(&self, ctx: &HandlerContext<'_>, _invocation: &Invocation) -> Result<Reply> {
        let drops = drop_queries::top_drops(ctx.db).await?;
        Ok(render_top(&drops, ctx.now))
    }
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, dispatch::CommandArgs, invoke},
        errors::Result,
    };

    /// View the latest drops on Drops Cloud
    #[poise::command(slash_command)]
    pub async fn drops(ctx: Context<'_>) -> Result<()> {
        invoke(ctx, CommandArgs::default()).await
    }

    /// Search for drops
    #[poise::command(slash_command)]
    pub async fn search(
        ctx: Context<'_>,
        #[description = "Search term"] query: String,
    ) -> Result<()> {
        let args = CommandArgs {
            query: Some(query),
            ..CommandArgs::default()
        };
        invoke(ctx, args).await
    }

    /// View top drops by unlocks
    #[poise::command(slash_command)]
    pub async fn top(ctx: Context<'_>) -> Result<()> {
        invoke(ctx, CommandArgs::default()).await
    }
}

pub use inner::*;
