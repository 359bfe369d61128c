//! Framework-agnostic reply payloads.
//!
//! Command handlers build these plain values; the transport converts them into
//! serenity builders at the edge. Keeping them free of serenity types lets the
//! handlers be asserted on directly in tests.

use chrono::{DateTime, Utc};

/// Embed colours used across the bot.
pub mod colours {
    /// Drops Cloud brand purple
    pub const PURPLE: u32 = 0x008B_5CF6;
    /// Success / positive balance
    pub const GREEN: u32 = 0x0010_B981;
    /// VIP and rankings
    pub const GOLD: u32 = 0x00FF_D700;
    /// Informational
    pub const BLUE: u32 = 0x003B_82F6;
    /// Discord blurple, used for account linking
    pub const BLURPLE: u32 = 0x0058_65F2;
    /// Inactive / muted
    pub const GREY: u32 = 0x006B_7280;
}

/// A message sent (or edited in) as the response to an interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// Plain text content
    pub content: Option<String>,
    /// Rich embeds, in display order
    pub embeds: Vec<Embed>,
    /// Only visible to the invoking user. Honoured on the initial response only.
    pub ephemeral: bool,
}

impl Reply {
    /// A reply consisting of plain text.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// A reply consisting of a single embed.
    #[must_use]
    pub fn embed(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ..Self::default()
        }
    }

    /// Sets whether the reply is only visible to the invoking user.
    #[must_use]
    pub const fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }
}

/// One field of an [`Embed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    /// Field heading
    pub name: String,
    /// Field body
    pub value: String,
    /// Render side by side with neighbouring inline fields
    pub inline: bool,
}

/// A structured rich-text message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    /// Heading
    pub title: Option<String>,
    /// Body text under the title
    pub description: Option<String>,
    /// Sidebar colour as `0xRRGGBB`
    pub colour: Option<u32>,
    /// Fields in display order
    pub fields: Vec<EmbedField>,
    /// Footer text
    pub footer: Option<String>,
    /// Thumbnail image URL
    pub thumbnail: Option<String>,
    /// Timestamp rendered next to the footer
    pub timestamp: Option<DateTime<Utc>>,
}

impl Embed {
    /// Creates an empty embed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the sidebar colour.
    #[must_use]
    pub const fn colour(mut self, colour: u32) -> Self {
        self.colour = Some(colour);
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Sets the footer text.
    #[must_use]
    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Sets the thumbnail URL.
    #[must_use]
    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }

    /// Sets the timestamp.
    #[must_use]
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Looks up a field by its exact name.
    #[must_use]
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// Shortens `text` to at most `max_chars` characters, appending `...` when cut.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(max_chars).collect();
    shortened.push_str("...");
    shortened
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate("short", 80), "short");
        assert_eq!(truncate("", 3), "");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "ééééé";
        assert_eq!(truncate(text, 2), "éé...");
    }

    #[test]
    fn test_embed_builder_collects_fields_in_order() {
        let embed = Embed::new()
            .title("t")
            .field("a", "1", true)
            .field("b", "2", false);

        assert_eq!(embed.fields.len(), 2);
        assert_eq!(embed.fields[0].name, "a");
        assert_eq!(embed.field_value("b"), Some("2"));
        assert_eq!(embed.field_value("missing"), None);
    }

    #[test]
    fn test_reply_text_is_not_ephemeral_by_default() {
        let reply = Reply::text("ok");
        assert_eq!(reply.content.as_deref(), Some("ok"));
        assert!(!reply.ephemeral);
        assert!(reply.ephemeral(true).ephemeral);
    }
}
