//! Database configuration module.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`
//! and created with `IF NOT EXISTS`, so pointing the bot at a database that the web
//! application already populated leaves existing data untouched.

use crate::entities::{
    AccountService, AccountStock, Announcement, Drop, UnlockedDrop, User, UserStats,
};
use crate::errors::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

/// Local `SQLite` file used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/drops_cloud.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database at `url`.
///
/// Works for both `sqlite://` and `postgres://` URLs. SQL statement logging from
/// sqlx is turned off; queries are traced by the callers instead.
#[instrument(skip(url))]
pub async fn create_connection(url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(url);
    options.sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!(backend = ?db.get_database_backend(), "Connected to database");
    Ok(db)
}

async fn create_table<E: EntityTrait>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<()> {
    let backend = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    debug!(table = entity.table_name(), "Ensured table exists");
    Ok(())
}

/// Creates all tables the bot reads from, skipping those that already exist.
///
/// Referenced tables are created before the tables that point at them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, User).await?;
    create_table(db, &schema, Drop).await?;
    create_table(db, &schema, UnlockedDrop).await?;
    create_table(db, &schema, AccountService).await?;
    create_table(db, &schema, AccountStock).await?;
    create_table(db, &schema, Announcement).await?;
    create_table(db, &schema, UserStats).await?;

    Ok(())
}
