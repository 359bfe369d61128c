//! Discord command implementations organized by category.
//!
//! Each command has two halves: a [`CommandHandler`](crate::bot::dispatch::CommandHandler)
//! that turns an invocation into a reply, and a thin poise command that declares
//! the slash-command options and hands off to the dispatcher.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Account commands (stats, balance, profile, vip, daily, link)
pub mod account;

/// Community commands (leaderboard, services, announcements)
pub mod community;

/// Drop listing commands (drops, search, top)
pub mod drops;

use crate::{
    bot::{BotData, dispatch::CommandRegistry},
    errors::Error,
};

// Export commands
pub use account::*;
pub use community::*;
pub use drops::*;

/// All poise slash commands, for registration with Discord.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        drops::drops(),
        drops::search(),
        drops::top(),
        account::stats(),
        account::balance(),
        account::profile(),
        account::vip(),
        account::daily(),
        account::link(),
        community::leaderboard(),
        community::services(),
        community::announcements(),
    ]
}

/// Registry with a handler for every command in [`all`].
#[must_use]
pub fn registry() -> CommandRegistry {
    CommandRegistry::new()
        .with(DropsCommand)
        .with(SearchCommand)
        .with(TopCommand)
        .with(StatsCommand)
        .with(BalanceCommand)
        .with(ProfileCommand)
        .with(VipCommand)
        .with(DailyCommand)
        .with(LinkCommand)
        .with(LeaderboardCommand)
        .with(ServicesCommand)
        .with(AnnouncementsCommand)
}
