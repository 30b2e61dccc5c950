//! Bounded per-message cache of parsed segments.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tracing::trace;

use super::content_parser::ContentParser;
use crate::domain::ContentSegment;
use crate::domain::entities::{Message, MessageId};

struct CachedSegments {
    fingerprint: u64,
    segments: Arc<[ContentSegment]>,
}

/// LRU of parsed message bodies keyed by message id. An entry is reused only
/// while the content it was parsed from is unchanged.
pub struct SegmentCache {
    entries: LruCache<MessageId, CachedSegments>,
    hits: u64,
    misses: u64,
}

impl SegmentCache {
    /// Creates a cache holding at most `capacity` messages (minimum one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the segments for `message`, parsing on miss or content change.
    pub fn get_or_parse(&mut self, message: &Message, parser: &ContentParser) -> Arc<[ContentSegment]> {
        let fingerprint = content_fingerprint(message.content());

        if let Some(cached) = self.entries.get(&message.id()) {
            if cached.fingerprint == fingerprint {
                self.hits += 1;
                trace!(message_id = %message.id(), "Segment cache hit");
                return cached.segments.clone();
            }
        }

        self.misses += 1;
        trace!(message_id = %message.id(), "Segment cache miss");
        let segments: Arc<[ContentSegment]> = parser.parse(message.id(), message.content()).into();
        self.entries.put(
            message.id(),
            CachedSegments {
                fingerprint,
                segments: segments.clone(),
            },
        );
        segments
    }

    /// Drops every entry, on topic switch.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `(hits, misses)`.
    #[must_use]
    pub const fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

pub(crate) fn content_fingerprint(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}
