use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Message, Topic, User};

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: u64,
    pub username: String,
    /// Empty when the account has no email.
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub id: u64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize)]
pub struct TopicResponse {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_by: UserResponse,
}

/// Body of `POST /topics/{id}/add_message/`.
#[derive(Debug, Serialize)]
pub struct NewMessageRequest<'a> {
    pub content: &'a str,
}

/// Error body. The server uses `error` for its own messages and `detail`
/// for framework-level rejections.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.detail)
    }
}

const fn default_active() -> bool {
    true
}

impl From<UserResponse> for User {
    fn from(value: UserResponse) -> Self {
        let user = Self::new(value.id, value.username);
        match value.email.filter(|email| !email.is_empty()) {
            Some(email) => user.with_email(email),
            None => user,
        }
    }
}

impl From<MessageResponse> for Message {
    fn from(value: MessageResponse) -> Self {
        Self::new(value.id, value.content, value.user.into(), value.created_at)
    }
}

impl From<TopicResponse> for Topic {
    fn from(value: TopicResponse) -> Self {
        Self::new(
            value.id,
            value.title,
            value.description,
            value.created_by.into(),
            value.created_at,
        )
        .with_active(value.is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageId, TopicId, UserId};

    #[test]
    fn test_message_payload() {
        let json = r#"{
            "id": 12,
            "content": "<p>hi</p>",
            "created_at": "2024-03-04T09:05:00.123456Z",
            "user": {"id": 3, "username": "grace", "email": "", "profile": {"bio": null, "avatar": null}}
        }"#;
        let message: Message = serde_json::from_str::<MessageResponse>(json).unwrap().into();

        assert_eq!(message.id(), MessageId(12));
        assert_eq!(message.content(), "<p>hi</p>");
        assert_eq!(message.author_id(), UserId(3));
        assert!(message.user().email().is_none());
    }

    #[test]
    fn test_topic_payload_ignores_embedded_messages() {
        let json = r#"{
            "id": 5,
            "title": "Rust",
            "description": "Ownership questions",
            "created_at": "2024-01-02T10:00:00+01:00",
            "is_active": false,
            "created_by": {"id": 1, "username": "ada", "email": "ada@example.com"},
            "messages": []
        }"#;
        let topic: Topic = serde_json::from_str::<TopicResponse>(json).unwrap().into();

        assert_eq!(topic.id(), TopicId(5));
        assert!(!topic.is_active());
        assert_eq!(topic.created_by().email(), Some("ada@example.com"));
        assert_eq!(topic.created_at().to_rfc3339(), "2024-01-02T09:00:00+00:00");
    }

    #[test]
    fn test_error_body() {
        let body: ErrorResponse = serde_json::from_str(r#"{"detail": "Not found."}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Not found."));
    }
}
