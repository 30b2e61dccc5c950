//! Clipboard writes for code blocks and whole messages.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::clipboard_extractor::{ClipboardExtractor, CopyFeedback, CopyTarget};
use super::notification_manager::NotificationManager;
use crate::domain::entities::Message;
use crate::domain::{ClipboardError, ClipboardPort, CodeSegmentId, ContentSegment};

/// Copies code blocks and messages to the clipboard. Failures are reported
/// as notifications and never interrupt the room.
pub struct CopyService {
    clipboard: Arc<dyn ClipboardPort>,
    extractor: ClipboardExtractor,
    feedback: CopyFeedback,
}

impl CopyService {
    /// `feedback_duration` is how long a "copied" indicator stays on.
    #[must_use]
    pub fn new(clipboard: Arc<dyn ClipboardPort>, feedback_duration: Duration) -> Self {
        Self {
            clipboard,
            extractor: ClipboardExtractor::new(),
            feedback: CopyFeedback::new(feedback_duration),
        }
    }

    /// Makes the code blocks of a rendered message copyable.
    pub fn register_segments(&mut self, segments: &[ContentSegment]) {
        self.extractor.register_segments(segments);
    }

    /// Copies the exact source of a code block. Returns true on success.
    pub async fn copy_code(
        &mut self,
        id: CodeSegmentId,
        notifications: &mut NotificationManager,
    ) -> bool {
        let target = CopyTarget::Code(id);
        let Some(text) = self.extractor.extract_code(id) else {
            return self.report_failure(
                target,
                &ClipboardError::UnknownTarget(target.to_string()),
                notifications,
            );
        };
        self.write(target, text, notifications).await
    }

    /// Copies the plain text of a whole message. Returns true on success.
    pub async fn copy_message(
        &mut self,
        message: &Message,
        notifications: &mut NotificationManager,
    ) -> bool {
        let text = ClipboardExtractor::message_text(message.content());
        self.write(CopyTarget::Message(message.id()), text, notifications)
            .await
    }

    /// Whether the "copied" indicator of `target` is showing.
    #[must_use]
    pub fn is_copied(&self, target: CopyTarget, now: Instant) -> bool {
        self.feedback.is_copied(target, now)
    }

    /// Expires elapsed indicators and returns the targets that went out.
    pub fn tick(&mut self, now: Instant) -> Vec<CopyTarget> {
        self.feedback.expire(now)
    }

    /// Forgets all registered code blocks and indicators.
    pub fn reset(&mut self) {
        self.extractor.clear();
        self.feedback.clear();
    }

    async fn write(
        &mut self,
        target: CopyTarget,
        text: String,
        notifications: &mut NotificationManager,
    ) -> bool {
        match self.clipboard.write(text).await {
            Ok(()) => {
                debug!(target = %target, "Copied to clipboard");
                self.feedback.mark(target, Instant::now());
                true
            }
            Err(e) => self.report_failure(target, &e, notifications),
        }
    }

    fn report_failure(
        &self,
        target: CopyTarget,
        error: &ClipboardError,
        notifications: &mut NotificationManager,
    ) -> bool {
        warn!(target = %target, error = %error, "Copy failed");
        notifications.error(format!("Copy failed: {error}"));
        false
    }
}
