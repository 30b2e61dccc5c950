use crate::domain::{ApiError, Message, Topic, TopicId};

/// Identifies the room session an event was produced for. Events whose tag
/// does not match the current session are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionTag {
    /// Topic the session was bound to.
    pub topic_id: TopicId,
    /// Bumped on every topic entry.
    pub generation: u64,
}

/// Completion of a background operation of the room.
#[derive(Debug, Clone)]
pub enum RoomEvent {
    /// Topic metadata fetch completed.
    TopicLoaded {
        /// Session the fetch was started in.
        tag: SessionTag,
        /// Topic metadata, or the failure.
        result: Result<Topic, ApiError>,
    },
    /// Feed fetch completed, on entry, refresh or poll tick.
    FeedLoaded {
        /// Session the fetch was started in.
        tag: SessionTag,
        /// Full feed, or the failure.
        result: Result<Vec<Message>, ApiError>,
    },
    /// A send completed.
    SendFinished {
        /// Session the send was started in.
        tag: SessionTag,
        /// Markup that was submitted.
        content: String,
        /// Server copy of the new message, or the failure.
        result: Result<Message, ApiError>,
        /// Feed fetched right after a successful send.
        refreshed: Option<Result<Vec<Message>, ApiError>>,
    },
}

impl RoomEvent {
    /// Session the event belongs to.
    #[must_use]
    pub const fn tag(&self) -> SessionTag {
        match self {
            Self::TopicLoaded { tag, .. }
            | Self::FeedLoaded { tag, .. }
            | Self::SendFinished { tag, .. } => *tag,
        }
    }
}
