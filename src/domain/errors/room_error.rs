//! Room-level error kinds surfaced to the user.

use thiserror::Error;

use super::ApiError;

/// Coarse classification used to decide where an error is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Topic or feed could not be fetched. Shown as a non-blocking banner.
    FetchFailure,
    /// A message could not be sent. Shown next to the compose control.
    SendFailure,
}

/// Errors held in a room's sync state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoomError {
    /// Topic metadata fetch failed.
    #[error("failed to fetch topic: {0}")]
    FetchTopic(#[source] ApiError),

    /// Message feed fetch failed.
    #[error("failed to fetch messages: {0}")]
    FetchFeed(#[source] ApiError),

    /// Message submission failed.
    #[error("failed to send message: {0}")]
    Send(#[source] ApiError),
}

impl RoomError {
    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::FetchTopic(_) | Self::FetchFeed(_) => ErrorKind::FetchFailure,
            Self::Send(_) => ErrorKind::SendFailure,
        }
    }

    /// Text shown to the user.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::FetchTopic(_) => "Failed to load topic details.",
            Self::FetchFeed(_) => "Failed to fetch messages. Please try again later.",
            Self::Send(_) => "Failed to send message. Please try again.",
        }
    }

    /// Underlying collaborator error.
    #[must_use]
    pub const fn api_error(&self) -> &ApiError {
        match self {
            Self::FetchTopic(e) | Self::FetchFeed(e) | Self::Send(e) => e,
        }
    }
}
