//! Account commands - personal stats, balances, profiles, VIP status, the daily
//! bonus, and linking instructions.
//!
//! Everything except `/link` needs a Drops Cloud account linked to the Discord
//! user being looked at; a missing link surfaces as `Error::NotLinked`.

use crate::{
    bot::dispatch::{Acknowledgement, CommandHandler, HandlerContext, Invocation, UserRef},
    core::{
        daily::{DailyClaim, claim_daily_bonus},
        users::{VipStatus, require_linked, vip_status},
    },
    entities::user,
    errors::{LinkSubject, Result},
    interaction::{Embed, Reply, colours},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

const VIP_ROLE: &str = "vip";
const DATE_FORMAT: &str = "%Y-%m-%d";

fn date(at: DateTime<Utc>) -> String {
    at.format(DATE_FORMAT).to_string()
}

const fn vip_label(status: VipStatus) -> &'static str {
    if status.is_active() {
        "✅ Active"
    } else {
        "❌ Inactive"
    }
}

/// Renders the `/stats` reply.
#[must_use]
pub fn render_stats(account: &user::Model, now: DateTime<Utc>) -> Reply {
    let vip = vip_status(account, now);
    let mut embed = Embed::new()
        .title(format!("📊 Stats for {}", account.username))
        .colour(colours::PURPLE)
        .field("💰 Coins", account.coin_balance.to_string(), true)
        .field("👑 Role", &account.role, true)
        .field("⭐ VIP Status", vip_label(vip), true)
        .field("📅 Member Since", date(account.created_at), true)
        .timestamp(now);

    if let VipStatus::Active { expires_at, .. } = vip {
        embed = embed.field("⏰ VIP Expires", date(expires_at), true);
    }
    Reply::embed(embed)
}

/// Renders the `/balance` reply. VIP accounts get a gold embed.
#[must_use]
pub fn render_balance(account: &user::Model, now: DateTime<Utc>) -> Reply {
    let colour = if account.role == VIP_ROLE {
        colours::GOLD
    } else {
        colours::GREEN
    };
    Reply::embed(
        Embed::new()
            .title("💰 Coin Balance")
            .colour(colour)
            .description(format!(
                "**{}** has **{}** coins",
                account.username, account.coin_balance
            ))
            .timestamp(now),
    )
}

/// Renders the `/profile` reply for `account`, linked to Discord user `target`.
#[must_use]
pub fn render_profile(account: &user::Model, target: &UserRef, now: DateTime<Utc>) -> Reply {
    let vip = vip_status(account, now);
    let mut embed = Embed::new()
        .title(format!("👤 Profile: {}", account.username))
        .colour(if vip.is_active() {
            colours::GOLD
        } else {
            colours::PURPLE
        })
        .thumbnail(&target.avatar_url)
        .field("💰 Coin Balance", account.coin_balance.to_string(), true)
        .field("👑 Role", &account.role, true)
        .field("⭐ VIP", vip_label(vip), true)
        .field("📦 Drops Created", account.total_drops_created.to_string(), true)
        .field(
            "💎 Total Earned",
            format!("{} coins", account.total_coins_earned),
            true,
        )
        .field(
            "🎯 Career Tier",
            account.career_tier.as_deref().unwrap_or("None"),
            true,
        )
        .footer(format!("Member since {}", date(account.created_at)))
        .timestamp(now);

    if let Some(bio) = account.bio.as_deref().filter(|b| !b.trim().is_empty()) {
        embed = embed.description(bio);
    }
    Reply::embed(embed)
}

/// Renders the `/vip` reply.
#[must_use]
pub fn render_vip(account: &user::Model, target: &UserRef, now: DateTime<Utc>) -> Reply {
    let embed = Embed::new()
        .title(format!("⭐ VIP Status: {}", account.username))
        .thumbnail(&target.avatar_url);

    let embed = match vip_status(account, now) {
        VipStatus::Active {
            expires_at,
            days_remaining,
        } => embed
            .colour(colours::GOLD)
            .description("✅ This user has an active VIP membership!")
            .field("📅 Expires On", date(expires_at), true)
            .field("⏰ Days Remaining", days_remaining.to_string(), true)
            .field(
                "🎨 Badge Color",
                account.vip_badge_color.as_deref().unwrap_or("Default"),
                true,
            ),
        VipStatus::Inactive => embed
            .colour(colours::GREY)
            .description("❌ This user does not have an active VIP membership.")
            .field(
                "💎 Get VIP",
                "Visit Drops Cloud to purchase VIP and enjoy exclusive benefits!",
                false,
            ),
    };
    Reply::embed(embed)
}

/// Renders the `/daily` reply after a successful claim.
#[must_use]
pub fn render_daily(claim: &DailyClaim, now: DateTime<Utc>) -> Reply {
    Reply::embed(
        Embed::new()
            .title("🎁 Daily Bonus Claimed!")
            .colour(colours::GREEN)
            .description(format!("**{}** claimed their daily bonus!", claim.username))
            .field("💰 Bonus Amount", format!("+{} coins", claim.bonus), true)
            .field("💳 New Balance", format!("{} coins", claim.new_balance), true)
            .field("📆 Days Claimed", claim.total_claims.to_string(), true)
            .footer("Come back tomorrow for another bonus!")
            .timestamp(now),
    )
}

/// Renders the `/link` instructions, pointing at the settings page under `app_url`.
#[must_use]
pub fn render_link(app_url: &str, now: DateTime<Utc>) -> Reply {
    let settings_url = format!("{app_url}/settings?discord_link=true");
    Reply::embed(
        Embed::new()
            .title("🔗 Link Your Discord Account")
            .colour(colours::BLURPLE)
            .description("To link your Discord account with Drops Cloud:")
            .field(
                "Step 1",
                format!("Go to your [Drops Cloud account settings]({settings_url})"),
                false,
            )
            .field("Step 2", "Find the \"Discord Integration\" section", false)
            .field("Step 3", "Click the \"Link Discord Account\" button", false)
            .field("Step 4", "Authorize the connection when prompted", false)
            .footer("Once linked, you can use personalized bot commands!")
            .timestamp(now),
    )
    .ephemeral(true)
}

/// `/stats`
pub struct StatsCommand;

#[async_trait]
impl CommandHandler for StatsCommand {
    fn name(&self) -> &'static str {
        "stats"
    }

    async fn handle(&self, ctx: &HandlerContext<'_>, invocation: &Invocation) -> Result<Reply> {
        let account = require_linked(ctx.db, &invocation.invoker.id, LinkSubject::Invoker).await?;
        Ok(render_stats(&account, ctx.now))
    }
}

/// `/balance [user]`
pub struct BalanceCommand;

#[async_trait]
impl CommandHandler for BalanceCommand {
    fn name(&self) -> &'static str {
        "balance"
    }

    async fn handle(&self, ctx: &HandlerContext<'_>, invocation: &Invocation) -> Result<Reply> {
        let (target, subject) = invocation.target();
        let account = require_linked(ctx.db, &target.id, subject).await?;
        Ok(render_balance(&account, ctx.now))
    }
}

/// `/profile [user]`
pub struct ProfileCommand;

#[async_trait]
impl CommandHandler for ProfileCommand {
    fn name(&self) -> &'static str {
        "profile"
    }

    async fn handle(&self, ctx: &HandlerContext<'_>, invocation: &Invocation) -> Result<Reply> {
        let (target, subject) = invocation.target();
        let account = require_linked(ctx.db, &target.id, subject).await?;
        Ok(render_profile(&account, target, ctx.now))
    }
}

/// `/vip [user]`
pub struct VipCommand;

#[async_trait]
impl CommandHandler for VipCommand {
    fn name(&self) -> &'static str {
        "vip"
    }

    async fn handle(&self, ctx: &HandlerContext<'_>, invocation: &Invocation) -> Result<Reply> {
        let (target, subject) = invocation.target();
        let account = require_linked(ctx.db, &target.id, subject).await?;
        Ok(render_vip(&account, target, ctx.now))
    }
}

/// `/daily`
pub struct DailyCommand;

#[async_trait]
impl CommandHandler for DailyCommand {
    fn name(&self) -> &'static str {
        "daily"
    }

    async fn handle(&self, ctx: &HandlerContext<'_>, invocation: &Invocation) -> Result<Reply> {
        let claim = claim_daily_bonus(
            ctx.db,
            &invocation.invoker.id,
            ctx.settings.bot.daily_bonus,
            ctx.now.date_naive(),
        )
        .await?;
        Ok(render_daily(&claim, ctx.now))
    }
}

/// `/link`
pub struct LinkCommand;

#[async_trait]
impl CommandHandler for LinkCommand {
    fn name(&self) -> &'static str {
        "link"
    }

    fn acknowledgement(&self) -> Acknowledgement {
        Acknowledgement::Immediate
    }

    async fn handle(&self, ctx: &HandlerContext<'_>, _invocation: &Invocation) -> Result<Reply> {
        Ok(render_link(ctx.settings.app_url(), ctx.now))
    }
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, dispatch::CommandArgs, invoke},
        errors::Result,
    };
    use poise::serenity_prelude as serenity;

    fn for_user(user: Option<serenity::User>) -> CommandArgs {
        CommandArgs {
            user: user.as_ref().map(Into::into),
            ..CommandArgs::default()
        }
    }

    /// View your Drops Cloud stats
    #[poise::command(slash_command)]
    pub async fn stats(ctx: Context<'_>) -> Result<()> {
        invoke(ctx, CommandArgs::default()).await
    }

    /// Check a coin balance
    #[poise::command(slash_command)]
    pub async fn balance(
        ctx: Context<'_>,
        #[description = "User to check (optional)"] user: Option<serenity::User>,
    ) -> Result<()> {
        invoke(ctx, for_user(user)).await
    }

    /// View a user profile
    #[poise::command(slash_command)]
    pub async fn profile(
        ctx: Context<'_>,
        #[description = "Discord user to view"] user: Option<serenity::User>,
    ) -> Result<()> {
        invoke(ctx, for_user(user)).await
    }

    /// Check VIP status
    #[poise::command(slash_command)]
    pub async fn vip(
        ctx: Context<'_>,
        #[description = "Discord user to check"] user: Option<serenity::User>,
    ) -> Result<()> {
        invoke(ctx, for_user(user)).await
    }

    /// Claim your daily coin bonus
    #[poise::command(slash_command)]
    pub async fn daily(ctx: Context<'_>) -> Result<()> {
        invoke(ctx, CommandArgs::default()).await
    }

    /// Get instructions to link your Discord account
    #[poise::command(slash_command)]
    pub async fn link(ctx: Context<'_>) -> Result<()> {
        invoke(ctx, CommandArgs::default()).await
    }
}

pub use inner::*;
