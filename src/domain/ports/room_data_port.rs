//! Port for the topic feed collaborator.

use async_trait::async_trait;

use crate::domain::entities::{Message, Topic, TopicId, User};
use crate::domain::errors::ApiError;

/// Data operations the room core needs from the backend.
#[async_trait]
pub trait RoomDataPort: Send + Sync {
    /// Fetches topic metadata.
    async fn fetch_topic(&self, topic_id: TopicId) -> Result<Topic, ApiError>;

    /// Fetches the full message feed, ascending by creation time.
    async fn fetch_messages(&self, topic_id: TopicId) -> Result<Vec<Message>, ApiError>;

    /// Submits raw editor markup as a new message.
    async fn send_message(&self, topic_id: TopicId, content: &str) -> Result<Message, ApiError>;

    /// Fetches the authenticated user.
    async fn fetch_current_user(&self) -> Result<User, ApiError>;
}
