use drops_cloud_bot::{
    bot::run_bot,
    config::{
        Settings,
        database::{create_connection, create_tables, get_database_url},
        settings::discord_token,
    },
    errors::Result,
};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Non-fatal: variables may be set by the environment instead
    dotenv().ok();

    let settings = Settings::from_env()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;
    info!(
        app_url = settings.app_url(),
        daily_bonus = settings.bot.daily_bonus,
        "Settings loaded"
    );

    let db = create_connection(&get_database_url())
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // Read directly before use; never stored in Settings
    let token = discord_token(|key| std::env::var(key).ok())
        .inspect_err(|e| error!("{}", e))?;

    run_bot(token, Arc::new(settings), db).await
}
