//! Bottom-pinning and "jump to latest" arbitration for the message list.

use tracing::trace;

use crate::domain::RoomSettings;

/// Geometry of the scrollable list, in pixels (or rows for the CLI).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// Scroll position of the viewport top.
    pub offset: u32,
    /// Total height of the list.
    pub content_height: u32,
    /// Visible height.
    pub viewport_height: u32,
}

impl ScrollMetrics {
    /// Distance between the bottom of the viewport and the end of content.
    #[must_use]
    pub fn distance_from_bottom(&self) -> i64 {
        i64::from(self.content_height) - i64::from(self.offset) - i64::from(self.viewport_height)
    }

    /// Offset that shows the end of the content.
    #[must_use]
    pub fn bottom_offset(&self) -> u32 {
        self.content_height.saturating_sub(self.viewport_height)
    }
}

/// Flags the list view renders from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    /// Within the jump-to-latest threshold of the end.
    pub at_bottom: bool,
    /// Messages arrived while the viewer was scrolled up.
    pub pending_new_messages: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            at_bottom: true,
            pending_new_messages: false,
        }
    }
}

/// What happened when the list grew.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthOutcome {
    /// The list was pinned to the newest message.
    AutoScrolled {
        /// The viewer was near the bottom.
        by_distance: bool,
        /// The newest message is the local user's.
        by_authorship: bool,
    },
    /// The viewer stays put and new messages are flagged.
    MarkedPending,
}

/// Tracks list geometry and decides when to follow new content.
#[derive(Debug)]
pub struct ScrollController {
    jump_threshold: i64,
    near_bottom_slack: i64,
    metrics: ScrollMetrics,
    state: ScrollState,
    scroll_requested: bool,
}

impl ScrollController {
    /// Creates a controller with the thresholds from `settings`.
    #[must_use]
    pub fn new(settings: &RoomSettings) -> Self {
        Self {
            jump_threshold: i64::from(settings.jump_to_latest_px),
            near_bottom_slack: i64::from(settings.near_bottom_px),
            metrics: ScrollMetrics::default(),
            state: ScrollState::default(),
            scroll_requested: false,
        }
    }

    /// Records new geometry after a scroll or a layout pass.
    ///
    /// Pending new messages are cleared once the viewer is within the
    /// near-bottom slack, not merely within the jump threshold.
    pub fn observe(&mut self, metrics: ScrollMetrics) {
        self.metrics = metrics;
        self.state.at_bottom = metrics.distance_from_bottom() <= self.jump_threshold;
        if self.was_near_bottom() {
            self.state.pending_new_messages = false;
        }
    }

    /// Whether the jump-to-latest control should be visible.
    #[must_use]
    pub const fn show_jump_to_latest(&self) -> bool {
        !self.state.at_bottom
    }

    /// Whether the viewer was close enough to the end to follow new content.
    #[must_use]
    pub fn was_near_bottom(&self) -> bool {
        i64::from(self.metrics.content_height) - i64::from(self.metrics.offset)
            <= i64::from(self.metrics.viewport_height) + self.near_bottom_slack
    }

    /// Decides between auto-scrolling and marking new messages as pending.
    /// Both triggers are evaluated on their own; either one scrolls.
    pub fn on_messages_grew(&mut self, newest_by_local_user: bool) -> GrowthOutcome {
        let by_distance = self.was_near_bottom();
        let by_authorship = newest_by_local_user;

        if by_distance || by_authorship {
            trace!(by_distance, by_authorship, "Auto-scrolling to newest message");
            self.scroll_to_bottom();
            GrowthOutcome::AutoScrolled {
                by_distance,
                by_authorship,
            }
        } else {
            self.state.pending_new_messages = true;
            GrowthOutcome::MarkedPending
        }
    }

    /// Explicit jump to the newest message. Also used after a successful send.
    pub fn scroll_to_bottom(&mut self) {
        self.metrics.offset = self.metrics.bottom_offset();
        self.state.at_bottom = true;
        self.state.pending_new_messages = false;
        self.scroll_requested = true;
    }

    /// Returns and clears the pending request for the renderer to scroll.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    /// Forgets geometry and state for a new topic.
    pub fn reset(&mut self) {
        self.metrics = ScrollMetrics::default();
        self.state = ScrollState::default();
        self.scroll_requested = false;
    }

    /// Last observed geometry.
    #[must_use]
    pub const fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    /// Current view flags.
    #[must_use]
    pub const fn state(&self) -> ScrollState {
        self.state
    }
}
