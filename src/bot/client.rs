//! Discord client startup.

use crate::{
    bot::{BotData, commands, dispatch::Dispatcher},
    config::{Settings, settings::WebhookSettings},
    errors::{Error, Result},
    webhook::{self, SerenityNotifier, WebhookState},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!(error = %error, "Bot setup failed");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(command = %ctx.command().name, error = %error, "Command returned an error");
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

async fn register_commands(
    ctx: &serenity::Context,
    commands: &[poise::Command<BotData, Error>],
    guild_id: Option<u64>,
) {
    let result = match guild_id {
        Some(id) => {
            info!(guild = id, "Registering slash commands in guild...");
            poise::builtins::register_in_guild(ctx, commands, serenity::GuildId::new(id)).await
        }
        None => {
            info!("Registering slash commands globally...");
            poise::builtins::register_globally(ctx, commands).await
        }
    };

    match result {
        Ok(()) => info!(count = commands.len(), "Registered slash commands"),
        Err(e) => error!(error = %e, "Failed to register slash commands"),
    }
}

fn start_webhook(settings: &WebhookSettings, http: Arc<serenity::Http>, bot_tag: String) {
    let Some(secret) = settings.secret.clone() else {
        warn!("BOT_WEBHOOK_SECRET is not set; the link webhook is disabled");
        return;
    };

    let state = WebhookState::new(secret, Arc::new(SerenityNotifier::new(http)), bot_tag);
    let port = settings.port;
    tokio::spawn(async move {
        if let Err(e) = webhook::serve(state, port).await {
            error!(error = %e, port, "Webhook server stopped");
        }
    });
}

/// Builds the poise framework and runs the Discord client until it stops.
///
/// On the first `Ready` event the slash commands are registered and, when a
/// secret is configured, the link webhook server is started.
#[instrument(skip_all)]
pub async fn run_bot(token: String, settings: Arc<Settings>, db: DatabaseConnection) -> Result<()> {
    let dispatcher = Dispatcher::new(commands::registry(), db, Arc::clone(&settings));

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!(
                    bot = %ready.user.tag(),
                    guilds = ready.guilds.len(),
                    "Logged in"
                );
                register_commands(ctx, &framework.options().commands, settings.bot.guild_id)
                    .await;
                start_webhook(&settings.webhook, Arc::clone(&ctx.http), ready.user.tag());
                Ok(BotData::new(dispatcher))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}
