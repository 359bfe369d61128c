//! Shared test utilities.
//!
//! Provides an in-memory database, `ActiveModel` fixtures with sensible defaults,
//! and a [`RecordingTransport`] that captures reply calls instead of sending them.
#![allow(clippy::unwrap_used)]

use crate::{
    bot::dispatch::{CommandArgs, Invocation, UserRef},
    entities::{account_service, announcement, drop, user},
    errors::Result,
    interaction::{GatewayError, Reply, ReplyTransport},
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::{Arc, Mutex};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Installs a tracing subscriber that writes through the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// An unlinked, active user with zero coins.
pub fn test_user(username: &str) -> user::ActiveModel {
    user::ActiveModel {
        username: Set(username.to_string()),
        discord_id: Set(None),
        profile_picture: Set(None),
        coin_balance: Set(0),
        total_coins_earned: Set(0),
        total_drops_created: Set(0),
        career_tier: Set(None),
        role: Set("user".to_string()),
        status: Set("active".to_string()),
        bio: Set(None),
        vip_expires_at: Set(None),
        vip_granted_at: Set(None),
        vip_badge_color: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}

/// Inserts a user linked to `discord_id` holding `coins`.
pub async fn linked_user(
    db: &DatabaseConnection,
    username: &str,
    discord_id: &str,
    coins: i64,
) -> Result<user::Model> {
    let mut model = test_user(username);
    model.discord_id = Set(Some(discord_id.to_string()));
    model.coin_balance = Set(coins);
    Ok(model.insert(db).await?)
}

/// A visible, unexpired drop costing 10 coins.
pub fn test_drop(title: &str) -> drop::ActiveModel {
    drop::ActiveModel {
        title: Set(title.to_string()),
        description: Set(None),
        service: Set(None),
        cost: Set(10),
        unlock_count: Set(0),
        owner_username: Set(Some("creator".to_string())),
        owner_id: Set(None),
        is_visible: Set(true),
        is_expired: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}

/// An active service whose display name is `name`.
pub fn test_service(name: &str) -> account_service::ActiveModel {
    account_service::ActiveModel {
        service_name: Set(name.to_lowercase()),
        display_name: Set(Some(name.to_string())),
        description: Set(None),
        is_active: Set(true),
        ..Default::default()
    }
}

/// An active `info` announcement without expiry.
pub fn test_announcement(title: &str) -> announcement::ActiveModel {
    announcement::ActiveModel {
        title: Set(title.to_string()),
        message: Set(format!("{title} body")),
        kind: Set("info".to_string()),
        is_active: Set(true),
        expires_at: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}

/// A Discord user reference with a predictable avatar URL.
pub fn discord_user(id: u64, name: &str) -> UserRef {
    UserRef {
        id: id.to_string(),
        name: name.to_string(),
        avatar_url: format!("https://cdn.example/avatars/{id}.png"),
    }
}

/// An invocation of `name` by `invoker` with the given arguments.
pub fn invocation(name: &str, invoker: UserRef, args: CommandArgs) -> Invocation {
    Invocation {
        name: name.to_string(),
        invoker,
        args,
    }
}

/// One call observed by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    /// `defer`
    Defer,
    /// `respond` with the given reply
    Respond(Reply),
    /// `edit` with the given reply
    Edit(Reply),
}

/// [`ReplyTransport`] that records calls, optionally failing every one of them.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<TransportCall>>>,
    failing: bool,
}

impl RecordingTransport {
    /// A transport where every call succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport where every call fails as if Discord were unreachable.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Calls recorded so far, in order.
    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: TransportCall) -> std::result::Result<(), GatewayError> {
        if self.failing {
            return Err(GatewayError::Transport("simulated gateway outage".into()));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl ReplyTransport for RecordingTransport {
    async fn defer(&self) -> std::result::Result<(), GatewayError> {
        self.record(TransportCall::Defer)
    }

    async fn respond(&self, reply: &Reply) -> std::result::Result<(), GatewayError> {
        self.record(TransportCall::Respond(reply.clone()))
    }

    async fn edit(&self, reply: &Reply) -> std::result::Result<(), GatewayError> {
        self.record(TransportCall::Edit(reply.clone()))
    }
}
