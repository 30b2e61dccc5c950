//! Discussion topic entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// Unique identifier for a discussion topic (a room).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicId(pub u64);

impl TopicId {
    /// Returns the underlying u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TopicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TopicId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Topic metadata. Immutable from the room's point of view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Topic {
    id: TopicId,
    title: String,
    description: String,
    created_by: User,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl Topic {
    /// Creates an active topic.
    #[must_use]
    pub fn new(
        id: impl Into<TopicId>,
        title: impl Into<String>,
        description: impl Into<String>,
        created_by: User,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            created_by,
            is_active: true,
            created_at,
        }
    }

    /// Sets the active flag.
    #[must_use]
    pub const fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Server-assigned id.
    #[must_use]
    pub const fn id(&self) -> TopicId {
        self.id
    }

    /// Topic title shown in the header.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Free-text description under the title.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// User who opened the topic.
    #[must_use]
    pub const fn created_by(&self) -> &User {
        &self.created_by
    }

    /// Whether the topic still accepts messages.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
