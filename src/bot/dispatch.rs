//! Command dispatch.
//!
//! A [`CommandRegistry`] maps command names to [`CommandHandler`]s. The
//! [`Dispatcher`] drives one [`Interaction`] through the reply protocol around
//! the handler call and funnels every error through [`Interaction::fail`], so a
//! handler never has to think about acknowledgements or error replies.

use crate::{
    config::Settings,
    core::leaderboard::LeaderboardCategory,
    errors::{LinkSubject, Result},
    interaction::{Interaction, Reply, ReplyTransport},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::{collections::HashMap, sync::Arc};
use tracing::{error, info, warn};

/// Reply sent for command names with no registered handler.
pub const UNKNOWN_COMMAND_MESSAGE: &str = "Unknown command.";

/// The parts of a Discord user the handlers need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    /// Discord user id
    pub id: String,
    /// Discord username
    pub name: String,
    /// Avatar URL (falls back to the default avatar)
    pub avatar_url: String,
}

impl From<&serenity::User> for UserRef {
    fn from(user: &serenity::User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            avatar_url: user.face(),
        }
    }
}

/// Parsed slash-command options. Each command reads only the ones it declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    /// `user` option
    pub user: Option<UserRef>,
    /// `query` option
    pub query: Option<String>,
    /// `category` option
    pub category: Option<LeaderboardCategory>,
}

/// One command call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Command name as registered with Discord
    pub name: String,
    /// User who ran the command
    pub invoker: UserRef,
    /// Options supplied with the command
    pub args: CommandArgs,
}

impl Invocation {
    /// The user a command is about: the `user` option when given, otherwise the invoker.
    #[must_use]
    pub fn target(&self) -> (&UserRef, LinkSubject) {
        match &self.args.user {
            Some(user) if user.id != self.invoker.id => (
                user,
                LinkSubject::Other {
                    name: user.name.clone(),
                },
            ),
            _ => (&self.invoker, LinkSubject::Invoker),
        }
    }
}

/// How a handler's reply reaches Discord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    /// Defer first, then edit the result in. Used for anything touching the database.
    Deferred,
    /// Respond directly with the result.
    Immediate,
}

/// What a handler gets besides the invocation.
#[derive(Debug, Clone, Copy)]
pub struct HandlerContext<'a> {
    /// Database connection
    pub db: &'a DatabaseConnection,
    /// Application settings
    pub settings: &'a Settings,
    /// Time the invocation is handled at
    pub now: DateTime<Utc>,
}

/// A single slash command.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Registered command name.
    fn name(&self) -> &'static str;

    /// How the reply is delivered.
    fn acknowledgement(&self) -> Acknowledgement {
        Acknowledgement::Deferred
    }

    /// Produces the reply for `invocation`.
    async fn handle(&self, ctx: &HandlerContext<'_>, invocation: &Invocation) -> Result<Reply>;
}

/// Command name to handler mapping.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `handler` under its name, replacing any previous handler of that name.
    #[must_use]
    pub fn with<H: CommandHandler + 'static>(mut self, handler: H) -> Self {
        self.handlers.insert(handler.name(), Arc::new(handler));
        self
    }

    /// Looks up the handler for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(name).map(Arc::clone)
    }

    /// Registered names in alphabetical order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// Routes invocations to handlers and owns the error boundary.
pub struct Dispatcher {
    registry: CommandRegistry,
    db: DatabaseConnection,
    settings: Arc<Settings>,
}

impl Dispatcher {
    /// Creates a dispatcher over `registry`.
    #[must_use]
    pub const fn new(registry: CommandRegistry, db: DatabaseConnection, settings: Arc<Settings>) -> Self {
        Self {
            registry,
            db,
            settings,
        }
    }

    /// Handles one invocation end to end. Errors are reported to the user and logged, never returned.
    pub async fn dispatch<T: ReplyTransport>(
        &self,
        interaction: &mut Interaction<T>,
        invocation: &Invocation,
    ) {
        info!(
            command = %invocation.name,
            user = %invocation.invoker.name,
            interaction = %interaction.id(),
            issued_at = %interaction.issued_at(),
            "Command received"
        );

        let Some(handler) = self.registry.get(&invocation.name) else {
            warn!(command = %invocation.name, "No handler registered");
            if let Err(e) = interaction.respond(Reply::text(UNKNOWN_COMMAND_MESSAGE)).await {
                error!(command = %invocation.name, error = %e, "Failed to answer unknown command");
            }
            return;
        };

        let ctx = HandlerContext {
            db: &self.db,
            settings: &self.settings,
            now: Utc::now(),
        };

        if let Err(err) = Self::run(handler.as_ref(), &ctx, interaction, invocation).await {
            if err.is_expected() {
                info!(command = %invocation.name, outcome = %err, "Command finished without result");
            } else {
                error!(command = %invocation.name, error = %err, "Command failed");
            }
            if let Err(e) = interaction.fail(&err.user_message()).await {
                error!(command = %invocation.name, error = %e, "Failed to report error to user");
            }
        }
    }

    async fn run<T: ReplyTransport>(
        handler: &dyn CommandHandler,
        ctx: &HandlerContext<'_>,
        interaction: &mut Interaction<T>,
        invocation: &Invocation,
    ) -> Result<()> {
        match handler.acknowledgement() {
            Acknowledgement::Deferred => {
                interaction.defer().await?;
                let reply = handler.handle(ctx, invocation).await?;
                interaction.update(reply).await?;
            }
            Acknowledgement::Immediate => {
                let reply = handler.handle(ctx, invocation).await?;
                interaction.respond(reply).await?;
            }
        }
        Ok(())
    }
}
