//! Queue of transient notifications.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::domain::{Notification, NotificationLevel};

/// FIFO of transient notifications. Only the front one is displayed.
#[derive(Debug)]
pub struct NotificationManager {
    queue: VecDeque<Notification>,
    default_duration: Duration,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl NotificationManager {
    /// Creates an empty queue whose notifications last `default_duration`.
    #[must_use]
    pub fn new(default_duration: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            default_duration,
        }
    }

    /// Queues a notification behind any pending ones.
    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        let notification = Notification::new(level, message).with_duration(self.default_duration);
        self.queue.push_back(notification);
    }

    /// Queues an info notification.
    pub fn info(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Info, message);
    }

    /// Queues an error notification.
    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Error, message);
    }

    /// Advances display state. Returns true when the visible notification changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(front) = self.queue.front_mut() else {
            return false;
        };
        let newly_shown = front.displayed_at.is_none();
        front.mark_displayed(now);
        if !front.is_expired_at(now) {
            return newly_shown;
        }

        self.queue.pop_front();
        if let Some(next) = self.queue.front_mut() {
            next.mark_displayed(now);
        }
        true
    }

    /// Drops the visible notification.
    pub fn dismiss(&mut self) {
        self.queue.pop_front();
    }

    /// The visible notification.
    #[must_use]
    pub fn current(&self) -> Option<&Notification> {
        self.queue.front()
    }

    /// Whether anything is queued.
    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !self.queue.is_empty()
    }
}
