//! The seam between the reply state machine and Discord.

use super::{
    GatewayError,
    payload::{Embed, Reply},
};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Raw gateway calls for one interaction.
///
/// Implementations perform the call and nothing else; ordering rules are
/// enforced by [`super::Interaction`].
#[async_trait]
pub trait ReplyTransport: Send + Sync {
    /// Acknowledges the interaction and shows a "thinking" state.
    async fn defer(&self) -> Result<(), GatewayError>;

    /// Sends the initial response message.
    async fn respond(&self, reply: &Reply) -> Result<(), GatewayError>;

    /// Replaces the visible response.
    async fn edit(&self, reply: &Reply) -> Result<(), GatewayError>;
}

/// [`ReplyTransport`] backed by serenity's interaction endpoints.
pub struct SerenityTransport {
    http: Arc<serenity::Http>,
    interaction: serenity::CommandInteraction,
}

impl SerenityTransport {
    /// Wraps a slash-command interaction.
    #[must_use]
    pub const fn new(http: Arc<serenity::Http>, interaction: serenity::CommandInteraction) -> Self {
        Self { http, interaction }
    }
}

#[async_trait]
impl ReplyTransport for SerenityTransport {
    async fn defer(&self) -> Result<(), GatewayError> {
        let builder =
            serenity::CreateInteractionResponse::Defer(serenity::CreateInteractionResponseMessage::new());
        self.interaction
            .create_response(&*self.http, builder)
            .await
            .map_err(GatewayError::from)
    }

    async fn respond(&self, reply: &Reply) -> Result<(), GatewayError> {
        let mut message = serenity::CreateInteractionResponseMessage::new()
            .embeds(reply.embeds.iter().map(create_embed).collect())
            .ephemeral(reply.ephemeral);
        if let Some(content) = &reply.content {
            message = message.content(content);
        }
        self.interaction
            .create_response(&*self.http, serenity::CreateInteractionResponse::Message(message))
            .await
            .map_err(GatewayError::from)
    }

    async fn edit(&self, reply: &Reply) -> Result<(), GatewayError> {
        // Content and embeds are both overwritten so the last edit fully wins.
        let builder = serenity::EditInteractionResponse::new()
            .content(reply.content.clone().unwrap_or_default())
            .embeds(reply.embeds.iter().map(create_embed).collect());
        self.interaction
            .edit_response(&*self.http, builder)
            .await
            .map(|_| ())
            .map_err(GatewayError::from)
    }
}

/// Converts an [`Embed`] into serenity's builder.
#[must_use]
pub fn create_embed(embed: &Embed) -> serenity::CreateEmbed {
    let mut builder = serenity::CreateEmbed::new();
    if let Some(title) = &embed.title {
        builder = builder.title(title);
    }
    if let Some(description) = &embed.description {
        builder = builder.description(description);
    }
    if let Some(colour) = embed.colour {
        builder = builder.colour(colour);
    }
    builder = builder.fields(
        embed
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.value.clone(), f.inline)),
    );
    if let Some(footer) = &embed.footer {
        builder = builder.footer(serenity::CreateEmbedFooter::new(footer));
    }
    if let Some(url) = &embed.thumbnail {
        builder = builder.thumbnail(url);
    }
    if let Some(timestamp) = embed
        .timestamp
        .and_then(|ts| serenity::Timestamp::from_unix_timestamp(ts.timestamp()).ok())
    {
        builder = builder.timestamp(timestamp);
    }
    builder
}
