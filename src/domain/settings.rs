//! Tunable thresholds and durations injected into the room components.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Room behaviour configuration (the `[room]` section of the config file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSettings {
    /// Period of the feed re-fetch, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How long a "copied" indicator stays visible, in milliseconds.
    #[serde(default = "default_copy_feedback_ms")]
    pub copy_feedback_ms: u64,

    /// Rendered height above which a message is collapsible, in pixels.
    #[serde(default = "default_collapse_height_px")]
    pub collapse_height_px: u32,

    /// Raw content length above which a message is collapsible, in characters.
    #[serde(default = "default_collapse_length_chars")]
    pub collapse_length_chars: usize,

    /// Distance from the bottom beyond which "jump to latest" is shown.
    #[serde(default = "default_jump_to_latest_px")]
    pub jump_to_latest_px: u32,

    /// Slack below which the viewer counts as near the bottom.
    #[serde(default = "default_near_bottom_px")]
    pub near_bottom_px: u32,

    /// Number of parsed messages kept in the segment cache.
    #[serde(default = "default_segment_cache_capacity")]
    pub segment_cache_capacity: usize,

    /// Display duration of transient notifications, in seconds.
    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,
}

impl RoomSettings {
    /// Feed re-fetch period.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Copied-indicator lifetime.
    #[must_use]
    pub const fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }

    /// Notification lifetime.
    #[must_use]
    pub const fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            copy_feedback_ms: default_copy_feedback_ms(),
            collapse_height_px: default_collapse_height_px(),
            collapse_length_chars: default_collapse_length_chars(),
            jump_to_latest_px: default_jump_to_latest_px(),
            near_bottom_px: default_near_bottom_px(),
            segment_cache_capacity: default_segment_cache_capacity(),
            notification_secs: default_notification_secs(),
        }
    }
}

const fn default_poll_interval_ms() -> u64 {
    3000
}

const fn default_copy_feedback_ms() -> u64 {
    2000
}

const fn default_collapse_height_px() -> u32 {
    150
}

const fn default_collapse_length_chars() -> usize {
    400
}

const fn default_jump_to_latest_px() -> u32 {
    200
}

const fn default_near_bottom_px() -> u32 {
    100
}

const fn default_segment_cache_capacity() -> usize {
    256
}

const fn default_notification_secs() -> u64 {
    5
}
