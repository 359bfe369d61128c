//! Unified error type for the bot.
//!
//! Business outcomes that the user is expected to run into (no linked account,
//! bonus already claimed, bad arguments) live next to genuine failures so that
//! every handler can use `?`. The dispatcher uses [`Error::is_expected`] to decide
//! how loudly to log and [`Error::user_message`] to decide what the user sees.

use crate::interaction::GatewayError;
use chrono::NaiveDate;
use thiserror::Error;

/// Generic text shown to the user when a command fails unexpectedly.
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred while processing your command.";

/// Whose account was looked up when a [`Error::NotLinked`] occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSubject {
    /// The user who invoked the command
    Invoker,
    /// Another Discord user named in the command arguments
    Other {
        /// Display name of the targeted user
        name: String,
    },
}

/// All errors produced by the bot.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Query failure reported by the data store
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Reply protocol violation or transport failure towards Discord
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// No Drops Cloud account is linked to the Discord identity
    #[error("No linked account for Discord user {discord_id}")]
    NotLinked {
        /// Discord user id that was looked up
        discord_id: String,
        /// Whether the lookup was for the invoker or someone else
        subject: LinkSubject,
    },

    /// The daily bonus was already claimed for this calendar day
    #[error("Daily bonus already claimed on {date}")]
    AlreadyClaimed {
        /// UTC date of the existing claim
        date: NaiveDate,
    },

    /// A command argument was missing or unusable
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Explanation shown to the user
        message: String,
    },

    /// Missing environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// I/O failure (config file, webhook listener)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure while building message text
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Error raised by the poise/serenity client itself
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Returns true for outcomes that are part of normal operation rather than failures.
    #[must_use]
    pub const fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NotLinked { .. } | Self::AlreadyClaimed { .. } | Self::InvalidInput { .. }
        )
    }

    /// Text to show the invoking user for this error.
    ///
    /// Unexpected failures collapse to [`GENERIC_FAILURE_MESSAGE`] so internal
    /// details never leak into the channel.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotLinked {
                subject: LinkSubject::Invoker,
                ..
            } => "❌ You need to link your Discord account first.\nUse `/link` for instructions."
                .to_string(),
            Self::NotLinked {
                subject: LinkSubject::Other { name },
                ..
            } => format!("❌ {name} hasn't linked their Discord account yet."),
            Self::AlreadyClaimed { .. } => "❌ You've already claimed your daily bonus today!\n\
                 Come back tomorrow for more coins."
                .to_string(),
            Self::InvalidInput { message } => format!("❌ {message}"),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
