use std::time::{Duration, Instant};

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Confirmation or hint.
    Info,
    /// A failed user action.
    Error,
}

/// A dismissible toast. Never blocks interaction with the room.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Text shown to the user.
    pub message: String,
    /// First time the notification was shown.
    pub displayed_at: Option<Instant>,
    /// How long it stays after first display.
    pub duration: Duration,
}

impl Notification {
    /// Creates a notification with the 5 s default lifetime.
    #[must_use]
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            displayed_at: None,
            duration: Duration::from_secs(5),
        }
    }

    /// Overrides the lifetime.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Expiry counts from first display, not from creation.
    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.displayed_at
            .is_some_and(|start| now.saturating_duration_since(start) > self.duration)
    }

    /// Starts the expiry clock on first display.
    pub fn mark_displayed(&mut self, now: Instant) {
        if self.displayed_at.is_none() {
            self.displayed_at = Some(now);
        }
    }
}
