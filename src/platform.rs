//! Messaging platform abstraction
//!
//! The menu never talks to a chat API directly. Everything it needs from the
//! outside world goes through the traits below, which lets the navigation
//! engine run against mock collaborators in tests.

mod error;

#[cfg(test)]
pub mod testing;

pub use error::{PlatformError, PlatformErrorKind};

use crate::menu::Markup;
use crate::session::{Session, SessionHandle};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier of a remote user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of the chat a menu message lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

/// Handle to a message already displayed on the remote side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub chat: ChatId,
    pub message_id: i64,
    /// Text currently shown above the options
    pub text: String,
}

/// A button press delivered by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Callback {
    /// Platform id used to acknowledge the press
    pub id: String,
    pub user: UserId,
    /// Option identifier the pressed button was rendered with
    pub data: String,
    pub message: Option<MessageRef>,
}

/// Client for the remote messaging surface
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a fresh message carrying the given options
    async fn send(
        &self,
        chat: ChatId,
        text: &str,
        markup: &Markup,
    ) -> Result<MessageRef, PlatformError>;

    /// Replace the text and options of an existing message
    async fn edit(
        &self,
        message: &MessageRef,
        text: &str,
        markup: &Markup,
    ) -> Result<MessageRef, PlatformError>;

    /// Acknowledge a button press so the client stops its spinner
    async fn respond(&self, callback: &Callback) -> Result<(), PlatformError>;
}

/// Label lookup for a locale path
pub trait Translator: Send + Sync {
    fn translate(&self, locale: &str, path: &str) -> String;
}

/// Per-user navigation state storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get the session of a user, if one was opened
    async fn session(&self, user: UserId) -> Option<SessionHandle>;

    /// Store a session, replacing any previous one for the same user
    async fn insert(&self, session: Session) -> SessionHandle;

    /// Forget a user's session
    async fn remove(&self, user: UserId) -> Option<SessionHandle>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: Messenger + ?Sized> Messenger for Arc<T> {
    async fn send(
        &self,
        chat: ChatId,
        text: &str,
        markup: &Markup,
    ) -> Result<MessageRef, PlatformError> {
        (**self).send(chat, text, markup).await
    }

    async fn edit(
        &self,
        message: &MessageRef,
        text: &str,
        markup: &Markup,
    ) -> Result<MessageRef, PlatformError> {
        (**self).edit(message, text, markup).await
    }

    async fn respond(&self, callback: &Callback) -> Result<(), PlatformError> {
        (**self).respond(callback).await
    }
}

impl<T: Translator + ?Sized> Translator for Arc<T> {
    fn translate(&self, locale: &str, path: &str) -> String {
        (**self).translate(locale, path)
    }
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn session(&self, user: UserId) -> Option<SessionHandle> {
        (**self).session(user).await
    }

    async fn insert(&self, session: Session) -> SessionHandle {
        (**self).insert(session).await
    }

    async fn remove(&self, user: UserId) -> Option<SessionHandle> {
        (**self).remove(user).await
    }
}

// ============================================================================
// Logging wrapper
// ============================================================================

/// Logs duration and outcome of every platform call
pub struct LoggingMessenger {
    inner: Arc<dyn Messenger>,
}

impl LoggingMessenger {
    pub fn new(inner: Arc<dyn Messenger>) -> Self {
        Self { inner }
    }
}

fn log_outcome<T>(
    operation: &str,
    started: std::time::Instant,
    result: &Result<T, PlatformError>,
) {
    let duration = started.elapsed();
    match result {
        Ok(_) => {
            tracing::debug!(
                operation,
                duration_ms = %duration.as_millis(),
                "Platform call completed"
            );
        }
        Err(e) => {
            tracing::warn!(
                operation,
                duration_ms = %duration.as_millis(),
                error = %e.message,
                retryable = e.kind.is_retryable(),
                "Platform call failed"
            );
        }
    }
}

#[async_trait]
impl Messenger for LoggingMessenger {
    async fn send(
        &self,
        chat: ChatId,
        text: &str,
        markup: &Markup,
    ) -> Result<MessageRef, PlatformError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(chat, text, markup).await;
        log_outcome("send", start, &result);
        result
    }

    async fn edit(
        &self,
        message: &MessageRef,
        text: &str,
        markup: &Markup,
    ) -> Result<MessageRef, PlatformError> {
        let start = std::time::Instant::now();
        let result = self.inner.edit(message, text, markup).await;
        log_outcome("edit", start, &result);
        result
    }

    async fn respond(&self, callback: &Callback) -> Result<(), PlatformError> {
        let start = std::time::Instant::now();
        let result = self.inner.respond(callback).await;
        log_outcome("respond", start, &result);
        result
    }
}
