//! REST client for the discussion feed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{ErrorResponse, MessageResponse, NewMessageRequest, TopicResponse, UserResponse};
use crate::domain::entities::{Message, Topic, TopicId, User};
use crate::domain::errors::ApiError;
use crate::domain::ports::RoomDataPort;

/// Server used when neither the config nor the CLI names one.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";
const USER_AGENT: &str = concat!("threadroom/", env!("CARGO_PKG_VERSION"));
const DEFAULT_RETRY_AFTER_MS: u64 = 5000;

/// HTTP adapter for [`RoomDataPort`].
pub struct RestRoomClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl RestRoomClient {
    /// Creates a client against `base_url`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(header::AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach feed server");
                if e.is_timeout() {
                    ApiError::network("request timed out")
                } else if e.is_connect() {
                    ApiError::network("failed to connect to server")
                } else {
                    ApiError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_response(status, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("failed to read response: {e}")))?;

        serde_json::from_str::<T>(&body).map_err(|e| {
            warn!(error = %e, body_len = body.len(), "Failed to parse response");
            ApiError::invalid_response(format!("failed to parse response: {e}"))
        })
    }

    async fn handle_error_response(status: StatusCode, response: reqwest::Response) -> ApiError {
        let retry_after_ms = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(|secs| secs.saturating_mul(1000));
        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorResponse>(&body).ok())
            .and_then(ErrorResponse::into_message);

        map_status(status, message, retry_after_ms)
    }
}

/// Maps a non-success status to an [`ApiError`].
fn map_status(status: StatusCode, message: Option<String>, retry_after_ms: Option<u64>) -> ApiError {
    let message = message.unwrap_or_else(|| format!("HTTP {status}"));
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::unauthorized(message),
        StatusCode::NOT_FOUND => ApiError::not_found(message),
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited {
            retry_after_ms: retry_after_ms.unwrap_or(DEFAULT_RETRY_AFTER_MS),
        },
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            ApiError::network("server is temporarily unavailable")
        }
        _ => ApiError::unexpected(format!("unexpected response: {status} - {message}")),
    }
}

#[async_trait]
impl RoomDataPort for RestRoomClient {
    async fn fetch_topic(&self, topic_id: TopicId) -> Result<Topic, ApiError> {
        debug!(topic_id = %topic_id, "Fetching topic");
        let request = self.client.get(self.url(&format!("/topics/{topic_id}/")));
        let topic: TopicResponse = self.execute(request).await?;
        Ok(topic.into())
    }

    async fn fetch_messages(&self, topic_id: TopicId) -> Result<Vec<Message>, ApiError> {
        debug!(topic_id = %topic_id, "Fetching messages");
        let request = self
            .client
            .get(self.url(&format!("/topics/{topic_id}/messages/")));
        let messages: Vec<MessageResponse> = self.execute(request).await?;
        Ok(messages.into_iter().map(Message::from).collect())
    }

    async fn send_message(&self, topic_id: TopicId, content: &str) -> Result<Message, ApiError> {
        debug!(topic_id = %topic_id, len = content.len(), "Sending message");
        let request = self
            .client
            .post(self.url(&format!("/topics/{topic_id}/add_message/")))
            .json(&NewMessageRequest { content });
        let message: MessageResponse = self.execute(request).await?;
        Ok(message.into())
    }

    async fn fetch_current_user(&self) -> Result<User, ApiError> {
        debug!("Fetching current user");
        let request = self.client.get(self.url("/auth/user/"));
        let user: UserResponse = self.execute(request).await?;
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_client_creation() {
        let client = RestRoomClient::new(DEFAULT_API_BASE, None);
        assert!(client.is_ok());
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = RestRoomClient::new("http://host/api/", Some("t".to_string())).unwrap();
        assert_eq!(client.url("/topics/1/"), "http://host/api/topics/1/");
    }

    #[test_case(StatusCode::UNAUTHORIZED ; "unauthorized")]
    #[test_case(StatusCode::FORBIDDEN ; "forbidden")]
    fn test_auth_statuses(status: StatusCode) {
        assert!(matches!(
            map_status(status, Some("Not authenticated".to_string()), None),
            ApiError::Unauthorized { .. }
        ));
    }

    #[test_case(StatusCode::BAD_GATEWAY ; "bad_gateway")]
    #[test_case(StatusCode::SERVICE_UNAVAILABLE ; "unavailable")]
    #[test_case(StatusCode::GATEWAY_TIMEOUT ; "gateway_timeout")]
    fn test_transient_statuses_are_network_errors(status: StatusCode) {
        assert!(map_status(status, None, None).is_network_error());
    }

    #[test]
    fn test_rate_limit_uses_retry_after() {
        assert_eq!(
            map_status(StatusCode::TOO_MANY_REQUESTS, None, Some(2000)),
            ApiError::RateLimited {
                retry_after_ms: 2000
            }
        );
        assert_eq!(
            map_status(StatusCode::TOO_MANY_REQUESTS, None, None),
            ApiError::RateLimited {
                retry_after_ms: DEFAULT_RETRY_AFTER_MS
            }
        );
    }

    #[test]
    fn test_other_status_keeps_server_message() {
        let error = map_status(
            StatusCode::BAD_REQUEST,
            Some("content: This field may not be blank.".to_string()),
            None,
        );
        assert_eq!(
            error.to_string(),
            "unexpected error: unexpected response: 400 Bad Request - content: This field may not be blank."
        );
    }

    #[test]
    fn test_not_found() {
        assert!(matches!(
            map_status(StatusCode::NOT_FOUND, None, None),
            ApiError::NotFound { .. }
        ));
    }
}
