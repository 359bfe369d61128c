//! Bot layer - Discord-specific interface and command handlers
//!
//! This module connects poise to the command dispatcher: every slash command is a
//! thin poise function that collects its options and calls [`invoke`], which wraps
//! the interaction in the reply state machine and hands it to the [`Dispatcher`].

/// Client construction, command registration, and startup
pub mod client;
/// Discord command implementations (drops, account, community)
pub mod commands;
/// Command registry and dispatcher
pub mod dispatch;

pub use client::run_bot;

use crate::{
    errors::{Error, Result},
    interaction::{Interaction, SerenityTransport},
};
use dispatch::{CommandArgs, Dispatcher, Invocation, UserRef};
use std::sync::Arc;
use tracing::warn;

/// Shared data available to all bot commands.
pub struct BotData {
    /// Routes invocations to handlers; owns the database connection and settings
    pub dispatcher: Dispatcher,
}

impl BotData {
    /// Creates a new `BotData` instance around `dispatcher`.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

/// Poise context type used by every command
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Runs the invoked slash command through the dispatcher.
///
/// Replies are sent by the dispatcher itself, so this only fails if poise hands us
/// something other than a slash-command interaction.
pub async fn invoke(ctx: Context<'_>, args: CommandArgs) -> Result<()> {
    let poise::Context::Application(app_ctx) = ctx else {
        warn!(command = %ctx.command().name, "Ignoring non-slash invocation");
        return Ok(());
    };

    let transport = SerenityTransport::new(
        Arc::clone(&ctx.serenity_context().http),
        app_ctx.interaction.clone(),
    );
    let mut interaction = Interaction::new(app_ctx.interaction.id.to_string(), transport);
    let invocation = Invocation {
        name: ctx.command().name.clone(),
        invoker: UserRef::from(ctx.author()),
        args,
    };

    ctx.data()
        .dispatcher
        .dispatch(&mut interaction, &invocation)
        .await;
    Ok(())
}
