use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{User, UserId};

/// Unique identifier for a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl MessageId {
    /// Returns the underlying u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MessageId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// One authored entry of a topic feed.
///
/// `content` is rich-text markup produced by the editor. The client never
/// edits or deletes a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    content: String,
    user: User,
    created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a message as delivered by the server.
    #[must_use]
    pub fn new(
        id: impl Into<MessageId>,
        content: impl Into<String>,
        user: User,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            user,
            created_at,
        }
    }

    /// Server-assigned id.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Raw editor markup.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Author.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Id of the author.
    #[must_use]
    pub const fn author_id(&self) -> UserId {
        self.user.id()
    }

    /// Creation time, used for ordering and timestamps.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Raw markup length in characters, as used by the collapse heuristic.
    #[must_use]
    pub fn content_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Position of a message inside its run of consecutive same-author messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPosition {
    /// First message of the run; shows the author header.
    pub first_in_group: bool,
    /// Last message of the run.
    pub last_in_group: bool,
}

/// Computes the visual grouping of a server-ordered message list.
#[must_use]
pub fn group_positions(messages: &[Message]) -> Vec<GroupPosition> {
    messages
        .iter()
        .enumerate()
        .map(|(i, message)| {
            let author = message.author_id();
            let first_in_group = i == 0 || messages[i - 1].author_id() != author;
            let last_in_group = messages
                .get(i + 1)
                .is_none_or(|next| next.author_id() != author);
            GroupPosition {
                first_in_group,
                last_in_group,
            }
        })
        .collect()
}
