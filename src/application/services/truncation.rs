//! Collapse state of long messages.

use std::collections::HashMap;

use super::segment_cache::content_fingerprint;
use crate::domain::RoomSettings;
use crate::domain::entities::{Message, MessageId};

/// Thresholds deciding whether a message offers "show more".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationPolicy {
    /// Rendered height limit, in pixels.
    pub max_height_px: u32,
    /// Raw content length limit, in characters.
    pub max_length_chars: usize,
}

impl TruncationPolicy {
    /// Reads both limits from the room settings.
    #[must_use]
    pub const fn from_settings(settings: &RoomSettings) -> Self {
        Self {
            max_height_px: settings.collapse_height_px,
            max_length_chars: settings.collapse_length_chars,
        }
    }

    /// Either limit alone is enough.
    #[must_use]
    pub const fn should_offer_expand(&self, rendered_height_px: u32, content_len: usize) -> bool {
        rendered_height_px > self.max_height_px || content_len > self.max_length_chars
    }
}

/// Inputs a measurement was taken under. Any change requires a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MeasureKey {
    content_fingerprint: u64,
    expanded: bool,
    viewport_width: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct MessageTruncation {
    expanded: bool,
    offers_expand: bool,
    measured: Option<MeasureKey>,
}

/// Per-message expand/collapse state, keyed by message id so that a new
/// message always starts collapsed.
#[derive(Debug)]
pub struct TruncationManager {
    policy: TruncationPolicy,
    states: HashMap<MessageId, MessageTruncation>,
}

impl TruncationManager {
    /// Creates a manager with no per-message state.
    #[must_use]
    pub fn new(policy: TruncationPolicy) -> Self {
        Self {
            policy,
            states: HashMap::new(),
        }
    }

    /// Whether `message` must be measured again at `viewport_width`.
    #[must_use]
    pub fn needs_measure(&self, message: &Message, viewport_width: u32) -> bool {
        let Some(state) = self.states.get(&message.id()) else {
            return true;
        };
        state.measured != Some(self.key_for(message, state.expanded, viewport_width))
    }

    /// Records the height measured after layout and returns whether the
    /// message offers expansion.
    pub fn record_measurement(
        &mut self,
        message: &Message,
        viewport_width: u32,
        rendered_height_px: u32,
    ) -> bool {
        let offers = self
            .policy
            .should_offer_expand(rendered_height_px, message.content_len());
        let expanded = self
            .states
            .get(&message.id())
            .is_some_and(|s| s.expanded);
        let key = self.key_for(message, expanded, viewport_width);

        let state = self.states.entry(message.id()).or_default();
        state.offers_expand = offers;
        state.measured = Some(key);
        offers
    }

    /// Flips the expansion of one message and returns the new value.
    pub fn toggle(&mut self, message_id: MessageId) -> bool {
        let state = self.states.entry(message_id).or_default();
        state.expanded = !state.expanded;
        state.expanded
    }

    /// Whether the user expanded the message.
    #[must_use]
    pub fn is_expanded(&self, message_id: MessageId) -> bool {
        self.states.get(&message_id).is_some_and(|s| s.expanded)
    }

    /// Whether the last measurement exceeded a limit.
    #[must_use]
    pub fn offers_expand(&self, message_id: MessageId) -> bool {
        self.states.get(&message_id).is_some_and(|s| s.offers_expand)
    }

    /// Collapsed means the renderer caps the height and shows the fade.
    #[must_use]
    pub fn is_collapsed(&self, message_id: MessageId) -> bool {
        self.states
            .get(&message_id)
            .is_some_and(|s| s.offers_expand && !s.expanded)
    }

    /// Height the renderer should show for a message of `rendered_height_px`.
    #[must_use]
    pub fn visible_height(&self, message_id: MessageId, rendered_height_px: u32) -> u32 {
        if self.is_collapsed(message_id) {
            rendered_height_px.min(self.policy.max_height_px)
        } else {
            rendered_height_px
        }
    }

    /// Drops state of messages no longer in the list.
    pub fn retain(&mut self, live: &[Message]) {
        self.states
            .retain(|id, _| live.iter().any(|message| message.id() == *id));
    }

    /// Forgets every message, on topic switch.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    fn key_for(&self, message: &Message, expanded: bool, viewport_width: u32) -> MeasureKey {
        MeasureKey {
            content_fingerprint: content_fingerprint(message.content()),
            expanded,
            viewport_width,
        }
    }
}
