//! Account-link webhook.
//!
//! The Drops Cloud website calls `POST /webhook/link` after a user links their
//! Discord account. The request carries `Authorization: Bearer <secret>` and a
//! JSON body `{"discordId": "...", "username": "..."}`; the bot answers by sending
//! the user a welcome DM. A failed DM is reported in the response body but is
//! not an HTTP error.

/// Error responses
pub mod error;
/// Welcome DM delivery
pub mod notifier;

pub use error::WebhookError;
pub use notifier::{LinkNotifier, SerenityNotifier, welcome_embed};

use crate::errors::Result;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

/// Shown to the caller when the welcome DM could not be delivered.
pub const DM_FAILURE_MESSAGE: &str = "User has DMs disabled or bot cannot reach user";

/// Shared state for the webhook handlers.
#[derive(Clone)]
pub struct WebhookState {
    secret: Arc<str>,
    notifier: Arc<dyn LinkNotifier>,
    bot_tag: Arc<str>,
}

impl WebhookState {
    /// Creates the state from the shared secret, the DM sender, and the bot's user tag.
    pub fn new(
        secret: impl Into<Arc<str>>,
        notifier: Arc<dyn LinkNotifier>,
        bot_tag: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            secret: secret.into(),
            notifier,
            bot_tag: bot_tag.into(),
        }
    }
}

/// `discordId` as sent by the website: a string snowflake, or a bare number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Snowflake {
    Text(String),
    Number(serde_json::Number),
}

/// Raw request body. Fields are optional so absence maps to a 400 with our own message.
#[derive(Debug, Deserialize)]
struct LinkBody {
    #[serde(rename = "discordId")]
    discord_id: Option<Snowflake>,
    username: Option<String>,
}

/// A validated link notification.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LinkNotification {
    discord_id: u64,
    username: String,
}

impl LinkNotification {
    fn parse(body: &[u8]) -> std::result::Result<Self, WebhookError> {
        let body: LinkBody = serde_json::from_slice(body)
            .map_err(|_| WebhookError::BadRequest("Invalid JSON body".to_string()))?;

        let discord_id = body.discord_id.and_then(|id| match id {
            Snowflake::Text(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Snowflake::Number(n) => Some(n.to_string()),
        });
        let username = body
            .username
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let (Some(discord_id), Some(username)) = (discord_id, username) else {
            return Err(WebhookError::BadRequest(
                "Missing required fields".to_string(),
            ));
        };

        let discord_id = discord_id
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .ok_or_else(|| WebhookError::BadRequest("Invalid discordId".to_string()))?;

        Ok(Self {
            discord_id,
            username,
        })
    }
}

fn authorize(headers: &HeaderMap, secret: &str) -> std::result::Result<(), WebhookError> {
    let expected = format!("Bearer {secret}");
    let provided = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if provided == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(WebhookError::Unauthorized)
    }
}

async fn link(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<Json<Value>, WebhookError> {
    authorize(&headers, &state.secret)
        .inspect_err(|_| warn!("Rejected unauthorized link notification"))?;
    let notification = LinkNotification::parse(&body)?;

    info!(
        username = %notification.username,
        discord_id = notification.discord_id,
        "Received link notification"
    );

    match state
        .notifier
        .send_welcome(notification.discord_id, &notification.username)
        .await
    {
        Ok(()) => {
            info!(username = %notification.username, "Welcome DM sent");
            Ok(Json(json!({ "success": true, "dmSent": true })))
        }
        Err(e) => {
            warn!(discord_id = notification.discord_id, error = %e, "Failed to send welcome DM");
            Ok(Json(json!({
                "success": true,
                "dmSent": false,
                "error": DM_FAILURE_MESSAGE,
            })))
        }
    }
}

async fn health(State(state): State<WebhookState>) -> Json<Value> {
    Json(json!({ "status": "ok", "bot": &*state.bot_tag }))
}

/// Builds the webhook router.
pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/webhook/link", post(link))
        .route("/health", get(health))
        .with_state(state)
}

/// Serves the webhook on `0.0.0.0:port` until the listener fails.
pub async fn serve(state: WebhookState, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "Webhook server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
