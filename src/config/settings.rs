//! Application settings.
//!
//! Non-secret tunables come from an optional `config.toml`; secrets and
//! deployment-specific values come from the environment (usually a `.env`
//! file loaded by `dotenvy`). Environment values win over the file.
//!
//! ```toml
//! [bot]
//! app_url = "https://drops-cloud.com"
//! daily_bonus = 50
//!
//! [webhook]
//! port = 3001
//! ```

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Default location of the settings file
pub const DEFAULT_SETTINGS_PATH: &str = "config.toml";

/// Top-level settings
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Slash-command behaviour
    pub bot: BotSettings,
    /// Account-link webhook
    pub webhook: WebhookSettings,
}

/// Settings used by the slash commands
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BotSettings {
    /// Base URL of the Drops Cloud website, used in links
    pub app_url: String,
    /// Coins credited by `/daily`
    pub daily_bonus: i64,
    /// Register commands in this guild only (faster propagation while developing)
    #[serde(skip)]
    pub guild_id: Option<u64>,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            app_url: "https://drops-cloud.com".to_string(),
            daily_bonus: 50,
            guild_id: None,
        }
    }
}

/// Settings for the account-link webhook server
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WebhookSettings {
    /// TCP port to listen on
    pub port: u16,
    /// Shared bearer secret; the server is not started without one
    #[serde(skip)]
    pub secret: Option<String>,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            port: 3001,
            secret: None,
        }
    }
}

impl Settings {
    /// Parses settings from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let settings: Self = toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse config.toml: {e}"),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from `path`, falling back to defaults when the file is missing.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "No settings file found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("Failed to read config file: {e}"),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads `config.toml` from the working directory and applies process environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::load(DEFAULT_SETTINGS_PATH)?;
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Applies environment-style overrides read through `lookup`.
    ///
    /// Empty values count as unset.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("APP_URL").or_else(|| get("NEXT_PUBLIC_APP_URL")) {
            self.bot.app_url = url;
        }
        if let Some(port) = get("BOT_PORT") {
            self.webhook.port = port.trim().parse().map_err(|e| Error::Config {
                message: format!("BOT_PORT must be a port number: {e}"),
            })?;
        }
        if let Some(guild) = get("DISCORD_GUILD_ID") {
            let id: u64 = guild.trim().parse().map_err(|e| Error::Config {
                message: format!("DISCORD_GUILD_ID must be a numeric id: {e}"),
            })?;
            self.bot.guild_id = Some(id).filter(|id| *id != 0);
        }
        self.webhook.secret = get("BOT_WEBHOOK_SECRET");

        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.bot.daily_bonus <= 0 {
            return Err(Error::Config {
                message: format!(
                    "daily_bonus must be positive, got {}",
                    self.bot.daily_bonus
                ),
            });
        }
        Ok(())
    }

    /// Base website URL without a trailing slash.
    #[must_use]
    pub fn app_url(&self) -> &str {
        self.bot.app_url.trim_end_matches('/')
    }
}

/// Reads the bot token through `lookup`, accepting either `DISCORD_TOKEN` or `DISCORD_BOT_TOKEN`.
pub fn discord_token(lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    lookup("DISCORD_TOKEN")
        .or_else(|| lookup("DISCORD_BOT_TOKEN"))
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| Error::Config {
            message: "DISCORD_TOKEN (or DISCORD_BOT_TOKEN) must be set".to_string(),
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.bot.daily_bonus, 50);
        assert_eq!(settings.webhook.port, 3001);
        assert_eq!(settings.app_url(), "https://drops-cloud.com");
        assert!(settings.webhook.secret.is_none());
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [bot]
            daily_bonus = 75
            "#,
        )
        .unwrap();

        assert_eq!(settings.bot.daily_bonus, 75);
        assert_eq!(settings.bot.app_url, "https://drops-cloud.com");
        assert_eq!(settings.webhook.port, 3001);
    }

    #[test]
    fn test_secret_is_never_read_from_file() {
        let settings = Settings::from_toml_str(
            r#"
            [webhook]
            port = 4000
            secret = "in-the-file"
            "#,
        )
        .unwrap();

        assert_eq!(settings.webhook.port, 4000);
        assert!(settings.webhook.secret.is_none());
    }

    #[test]
    fn test_rejects_non_positive_bonus() {
        let result = Settings::from_toml_str("[bot]\ndaily_bonus = 0\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load("definitely/not/here/config.toml").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let vars = env(&[
            ("NEXT_PUBLIC_APP_URL", "https://staging.drops-cloud.com/"),
            ("BOT_PORT", "8080"),
            ("BOT_WEBHOOK_SECRET", "s3cret"),
            ("DISCORD_GUILD_ID", "1234"),
        ]);
        let mut settings = Settings::default();
        settings.apply_overrides(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(settings.app_url(), "https://staging.drops-cloud.com");
        assert_eq!(settings.webhook.port, 8080);
        assert_eq!(settings.webhook.secret.as_deref(), Some("s3cret"));
        assert_eq!(settings.bot.guild_id, Some(1234));
    }

    #[test]
    fn test_app_url_prefers_primary_key() {
        let vars = env(&[
            ("APP_URL", "https://a.example"),
            ("NEXT_PUBLIC_APP_URL", "https://b.example"),
        ]);
        let mut settings = Settings::default();
        settings.apply_overrides(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(settings.app_url(), "https://a.example");
    }

    #[test]
    fn test_blank_secret_counts_as_unset() {
        let vars = env(&[("BOT_WEBHOOK_SECRET", "  ")]);
        let mut settings = Settings::default();
        settings.apply_overrides(|k| vars.get(k).cloned()).unwrap();
        assert!(settings.webhook.secret.is_none());
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let vars = env(&[("BOT_PORT", "not-a-port")]);
        let mut settings = Settings::default();
        let result = settings.apply_overrides(|k| vars.get(k).cloned());
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_discord_token_fallback() {
        let vars = env(&[("DISCORD_BOT_TOKEN", "legacy")]);
        assert_eq!(discord_token(|k| vars.get(k).cloned()).unwrap(), "legacy");

        let vars = env(&[("DISCORD_TOKEN", "new"), ("DISCORD_BOT_TOKEN", "legacy")]);
        assert_eq!(discord_token(|k| vars.get(k).cloned()).unwrap(), "new");

        assert!(discord_token(|_| None).is_err());
    }
}
