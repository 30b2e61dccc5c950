//! Parsed fragments of a message body.

use super::Language;
use super::entities::MessageId;

/// Stable identifier of a code segment: owning message plus segment position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeSegmentId {
    /// Message the segment belongs to.
    pub message_id: MessageId,
    /// Index of the segment within the message's segment list.
    pub position: usize,
}

impl CodeSegmentId {
    /// Identifies the segment at `position` in `message_id`.
    #[must_use]
    pub const fn new(message_id: MessageId, position: usize) -> Self {
        Self {
            message_id,
            position,
        }
    }
}

impl std::fmt::Display for CodeSegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "code-{}-{}", self.message_id, self.position)
    }
}

/// A highlighted code block recovered from the editor's code-block convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSegment {
    /// Stable per-message, per-position id.
    pub id: CodeSegmentId,
    /// Decoded source text. Serves as the exact-copy side channel.
    pub raw_code: String,
    /// Classified language.
    pub language: Language,
    /// Highlighted markup wrapped in a `<pre><code>` container.
    pub highlighted_html: String,
}

/// One renderable fragment of a message body.
///
/// `Text` markup is passed through from the server verbatim and is NOT
/// sanitized. Embedders that cannot trust every author must sanitize it
/// before display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSegment {
    /// Markup outside any code block.
    Text {
        /// Server markup, unsanitized.
        html: String,
    },
    /// A recognized code block.
    Code(CodeSegment),
}

impl ContentSegment {
    /// Wraps a run of markup.
    #[must_use]
    pub fn text(html: impl Into<String>) -> Self {
        Self::Text { html: html.into() }
    }

    /// The code segment, if this is one.
    #[must_use]
    pub const fn as_code(&self) -> Option<&CodeSegment> {
        match self {
            Self::Code(code) => Some(code),
            Self::Text { .. } => None,
        }
    }
}
