//! Resolves what goes on the clipboard and tracks "copied" indicators.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use super::markup::{markup_to_plain_text, text_content};
use crate::domain::entities::MessageId;
use crate::domain::{CodeSegmentId, ContentSegment};

/// Something the user can copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyTarget {
    /// One code block.
    Code(CodeSegmentId),
    /// A whole message.
    Message(MessageId),
}

impl CopyTarget {
    /// Message the target belongs to.
    #[must_use]
    pub const fn message_id(self) -> MessageId {
        match self {
            Self::Code(id) => id.message_id,
            Self::Message(id) => id,
        }
    }
}

impl fmt::Display for CopyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(id) => write!(f, "{id}"),
            Self::Message(id) => write!(f, "message-{id}"),
        }
    }
}

/// Keeps the exact source of every rendered code block so copies never
/// depend on the highlighted markup.
#[derive(Debug, Default)]
pub struct ClipboardExtractor {
    originals: HashMap<CodeSegmentId, String>,
    rendered: HashMap<CodeSegmentId, String>,
}

impl ClipboardExtractor {
    /// Creates an empty extractor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the code segments of one parsed message.
    pub fn register_segments(&mut self, segments: &[ContentSegment]) {
        for code in segments.iter().filter_map(ContentSegment::as_code) {
            self.originals.insert(code.id, code.raw_code.clone());
            self.rendered.insert(code.id, code.highlighted_html.clone());
        }
    }

    /// Registers highlighted markup for a block whose source is not known.
    pub fn register_rendered(&mut self, id: CodeSegmentId, html: impl Into<String>) {
        self.rendered.insert(id, html.into());
    }

    /// Text to copy for a code block. The original source wins; otherwise the
    /// text is rebuilt from the rendered markup.
    #[must_use]
    pub fn extract_code(&self, id: CodeSegmentId) -> Option<String> {
        self.originals
            .get(&id)
            .cloned()
            .or_else(|| self.rendered.get(&id).map(|html| reconstruct_from_rendered(html)))
    }

    /// Plain text of a whole message.
    #[must_use]
    pub fn message_text(content: &str) -> String {
        markup_to_plain_text(content)
    }

    /// Forgets every registered block.
    pub fn clear(&mut self) {
        self.originals.clear();
        self.rendered.clear();
    }
}

/// Rebuilds source text from highlighted markup: each line keeps as many
/// leading spaces as it had leading whitespace characters.
#[must_use]
pub fn reconstruct_from_rendered(html: &str) -> String {
    text_content(html)
        .split('\n')
        .map(|line| {
            let indent = line.chars().take_while(|c| c.is_whitespace()).count();
            format!("{}{}", " ".repeat(indent), line.trim())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Which targets were copied recently. Each target's indicator is independent.
#[derive(Debug)]
pub struct CopyFeedback {
    duration: Duration,
    copied: HashMap<CopyTarget, Instant>,
}

impl CopyFeedback {
    /// Indicators stay on for `duration`.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            copied: HashMap::new(),
        }
    }

    /// Starts (or restarts) the indicator of `target`.
    pub fn mark(&mut self, target: CopyTarget, now: Instant) {
        self.copied.insert(target, now);
    }

    /// Whether `target` was copied less than the duration before `now`.
    #[must_use]
    pub fn is_copied(&self, target: CopyTarget, now: Instant) -> bool {
        self.copied
            .get(&target)
            .is_some_and(|at| now.saturating_duration_since(*at) < self.duration)
    }

    /// Drops elapsed indicators and returns their targets.
    pub fn expire(&mut self, now: Instant) -> Vec<CopyTarget> {
        let duration = self.duration;
        let mut expired = Vec::new();
        self.copied.retain(|target, at| {
            let live = now.saturating_duration_since(*at) < duration;
            if !live {
                expired.push(*target);
            }
            live
        });
        expired
    }

    /// Drops every indicator.
    pub fn clear(&mut self) {
        self.copied.clear();
    }
}
