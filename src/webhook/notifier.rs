//! Welcome direct messages for freshly linked accounts.

use crate::interaction::{Embed, GatewayError, colours, create_embed};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Sends the welcome message after an account link.
#[async_trait]
pub trait LinkNotifier: Send + Sync {
    /// Direct-messages Discord user `discord_id`, greeting them as `username`.
    async fn send_welcome(&self, discord_id: u64, username: &str) -> Result<(), GatewayError>;
}

/// [`LinkNotifier`] that sends a real Discord DM.
pub struct SerenityNotifier {
    http: Arc<serenity::Http>,
}

impl SerenityNotifier {
    /// Creates a notifier using the bot's HTTP client.
    #[must_use]
    pub const fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl LinkNotifier for SerenityNotifier {
    async fn send_welcome(&self, discord_id: u64, username: &str) -> Result<(), GatewayError> {
        let message =
            serenity::CreateMessage::new().embed(create_embed(&welcome_embed(username, Utc::now())));
        serenity::UserId::new(discord_id)
            .direct_message(&*self.http, message)
            .await?;
        Ok(())
    }
}

/// The welcome embed.
#[must_use]
pub fn welcome_embed(username: &str, now: DateTime<Utc>) -> Embed {
    Embed::new()
        .title("🎉 Discord Account Linked Successfully!")
        .colour(colours::GREEN)
        .description(format!("Welcome to Drops Cloud, **{username}**!"))
        .field(
            "✅ Account Connected",
            "Your Discord account is now linked to Drops Cloud!",
            false,
        )
        .field(
            "🤖 Bot Commands",
            "You can now use all bot commands:\n\
             • `/drops` - View latest drops\n\
             • `/stats` - Check your stats\n\
             • `/balance` - View coin balance\n\
             • `/search` - Search for drops\n\
             • `/services` - View account services\n\
             • `/profile` - View a user profile\n\
             • `/announcements` - View latest announcements\n\
             • `/vip` - Check VIP status\n\
             • `/daily` - Claim daily bonus\n\
             • `/top` - View top drops by unlocks\n\
             • `/leaderboard` - View top users",
            false,
        )
        .field(
            "💡 What's Next?",
            "Start exploring drops, claim accounts, and earn coins on Drops Cloud!",
            false,
        )
        .footer("Thank you for joining Drops Cloud!")
        .timestamp(now)
}
