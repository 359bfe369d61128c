//! Reply state machine for a single slash-command interaction.
//!
//! Discord allows exactly one initial response per interaction (either a message
//! or a "thinking" deferral), which must arrive within a few seconds. After that,
//! the response can only be edited, and only for a limited time. [`Interaction`]
//! tracks which of these steps has happened and refuses calls that the gateway
//! would reject, so handlers fail fast with a typed [`GatewayError`].

pub mod payload;
pub mod transport;

pub use payload::{Embed, EmbedField, Reply, colours, truncate};
pub use transport::{ReplyTransport, SerenityTransport, create_embed};

use chrono::{DateTime, Duration, Utc};
use poise::serenity_prelude as serenity;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Seconds the gateway waits for the initial acknowledgement.
pub const INITIAL_RESPONSE_WINDOW_SECS: i64 = 3;

/// Seconds after the first acknowledgement during which edits are accepted.
pub const FOLLOW_UP_WINDOW_SECS: i64 = 15 * 60;

/// How far an interaction has progressed through the reply protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyState {
    /// Nothing has been sent yet
    Fresh,
    /// Acknowledged with a "thinking" indicator; the real reply comes via an edit
    Deferred,
    /// A visible response exists
    Replied,
}

impl fmt::Display for ReplyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fresh => "fresh",
            Self::Deferred => "deferred",
            Self::Replied => "replied",
        };
        f.write_str(name)
    }
}

/// The gateway time limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseWindow {
    /// Initial acknowledgement deadline, counted from arrival
    Initial,
    /// Edit deadline, counted from the first acknowledgement
    FollowUp,
}

impl fmt::Display for ResponseWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => f.write_str("initial response"),
            Self::FollowUp => f.write_str("follow-up"),
        }
    }
}

/// Errors raised while talking to the gateway about one interaction.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// `defer`/`respond` called after the interaction was acknowledged
    #[error("Interaction already acknowledged (state: {state})")]
    AlreadyAcknowledged {
        /// State at the time of the rejected call
        state: ReplyState,
    },

    /// `update` called before any acknowledgement
    #[error("Interaction has not been acknowledged yet")]
    NotAcknowledged,

    /// A failure message was never delivered, so the interaction was closed unacknowledged
    #[error("Interaction was closed without an acknowledgement: {reason}")]
    Closed {
        /// Why the closing reply was rejected
        reason: String,
    },

    /// A response window elapsed
    #[error("The {window} window has expired")]
    Expired {
        /// Which window elapsed
        window: ResponseWindow,
    },

    /// The HTTP call to Discord failed
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<serenity::Error> for GatewayError {
    fn from(value: serenity::Error) -> Self {
        Self::Transport(Box::new(value))
    }
}

/// One inbound command invocation and its reply state.
pub struct Interaction<T: ReplyTransport> {
    id: String,
    state: ReplyState,
    issued_at: DateTime<Utc>,
    acknowledged_at: Option<DateTime<Utc>>,
    closed_reason: Option<String>,
    visible: Option<Reply>,
    transport: T,
}

impl<T: ReplyTransport> Interaction<T> {
    /// Wraps an interaction that arrived just now.
    pub fn new(id: impl Into<String>, transport: T) -> Self {
        Self::with_issued_at(id, transport, Utc::now())
    }

    /// Wraps an interaction that arrived at `issued_at`.
    pub fn with_issued_at(id: impl Into<String>, transport: T, issued_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            state: ReplyState::Fresh,
            issued_at,
            acknowledged_at: None,
            closed_reason: None,
            visible: None,
            transport,
        }
    }

    /// Gateway-assigned identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current reply state.
    #[must_use]
    pub const fn state(&self) -> ReplyState {
        self.state
    }

    /// Arrival time.
    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// The response currently shown to the user, if any.
    #[must_use]
    pub const fn visible_reply(&self) -> Option<&Reply> {
        self.visible.as_ref()
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    fn ensure_fresh(&self) -> Result<(), GatewayError> {
        if self.state != ReplyState::Fresh {
            return Err(GatewayError::AlreadyAcknowledged { state: self.state });
        }
        if Utc::now() - self.issued_at > Duration::seconds(INITIAL_RESPONSE_WINDOW_SECS) {
            return Err(GatewayError::Expired {
                window: ResponseWindow::Initial,
            });
        }
        Ok(())
    }

    /// Acknowledges the interaction without content. The reply follows via [`Self::update`].
    ///
    /// # Errors
    /// Returns [`GatewayError`] if the interaction was already acknowledged, the
    /// initial window has elapsed, or the transport call fails.
    pub async fn defer(&mut self) -> Result<(), GatewayError> {
        self.ensure_fresh()?;
        self.transport.defer().await?;
        self.state = ReplyState::Deferred;
        self.acknowledged_at = Some(Utc::now());
        debug!(interaction = %self.id, "Deferred reply");
        Ok(())
    }

    /// Sends `reply` as the one initial response.
    ///
    /// # Errors
    /// Returns [`GatewayError`] if the interaction was already acknowledged, the
    /// initial window has elapsed, or the transport call fails. The state is left
    /// unchanged on error.
    pub async fn respond(&mut self, reply: Reply) -> Result<(), GatewayError> {
        self.ensure_fresh()?;
        self.transport.respond(&reply).await?;
        self.state = ReplyState::Replied;
        self.acknowledged_at = Some(Utc::now());
        self.visible = Some(reply);
        Ok(())
    }

    /// Replaces the visible response with `reply`.
    ///
    /// # Errors
    /// Returns [`GatewayError::NotAcknowledged`] on a fresh interaction,
    /// [`GatewayError::Closed`] if [`Self::fail`] gave up before any acknowledgement,
    /// [`GatewayError::Expired`] once the follow-up window has elapsed, or a
    /// transport error.
    pub async fn update(&mut self, reply: Reply) -> Result<(), GatewayError> {
        let Some(acknowledged_at) = self.acknowledged_at else {
            return Err(self.closed_reason.as_ref().map_or(
                GatewayError::NotAcknowledged,
                |reason| GatewayError::Closed {
                    reason: reason.clone(),
                },
            ));
        };
        if Utc::now() - acknowledged_at > Duration::seconds(FOLLOW_UP_WINDOW_SECS) {
            return Err(GatewayError::Expired {
                window: ResponseWindow::FollowUp,
            });
        }
        self.transport.edit(&reply).await?;
        self.state = ReplyState::Replied;
        self.visible = Some(reply);
        Ok(())
    }

    /// Shows `message` to the user through whichever call the current state allows.
    ///
    /// The interaction is `Replied` afterwards even when the gateway rejected the
    /// call; the error is handed back for logging only.
    ///
    /// # Errors
    /// Returns the [`GatewayError`] from the underlying `respond` or `update`.
    pub async fn fail(&mut self, message: &str) -> Result<(), GatewayError> {
        let reply = Reply::text(message).ephemeral(true);
        let result = if self.state == ReplyState::Fresh {
            self.respond(reply).await
        } else {
            self.update(reply).await
        };
        if let Err(e) = &result {
            warn!(interaction = %self.id, error = %e, "Could not deliver failure message");
            if self.acknowledged_at.is_none() && self.closed_reason.is_none() {
                self.closed_reason = Some(e.to_string());
            }
        }
        self.state = ReplyState::Replied;
        result
    }

    #[cfg(test)]
    pub(crate) fn backdate_acknowledgement(&mut self, by: Duration) {
        self.acknowledged_at = self.acknowledged_at.map(|at| at - by);
    }
}
