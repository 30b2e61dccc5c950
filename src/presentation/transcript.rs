//! Line-oriented rendering of a room for the terminal.

use std::time::Instant;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::application::services::formatter::{format_date, format_timestamp_now};
use crate::application::services::markup::markup_to_plain_text;
use crate::application::services::{
    ContentParser, CopyService, CopyTarget, SegmentCache, TruncationManager, TruncationPolicy,
};
use crate::domain::entities::{GroupPosition, group_positions};
use crate::domain::{ContentSegment, Message, MessageId, RoomSettings, Topic, UserId};

/// Terminal rows are mapped to pixels with a fixed line height.
pub const ROW_HEIGHT_PX: u32 = 20;
const GUTTER_WIDTH: usize = 6;
const MIN_BODY_WIDTH: usize = 20;
const COPIED_MARK: &str = "✓ copied";

/// Append-only rendering state of one room.
pub struct Transcript {
    parser: ContentParser,
    cache: SegmentCache,
    truncation: TruncationManager,
    width: usize,
    printed: Vec<MessageId>,
    rows: usize,
}

impl Transcript {
    /// Renders rows at most `width` columns wide.
    #[must_use]
    pub fn new(parser: ContentParser, settings: &RoomSettings, width: usize) -> Self {
        Self {
            parser,
            cache: SegmentCache::new(settings.segment_cache_capacity),
            truncation: TruncationManager::new(TruncationPolicy::from_settings(settings)),
            width,
            printed: Vec::new(),
            rows: 0,
        }
    }

    /// Total rows printed so far.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Forgets everything printed, for a new room.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.truncation.clear();
        self.printed.clear();
        self.rows = 0;
    }

    /// Title, description and creation line of a topic.
    #[must_use]
    pub fn topic_header(topic: &Topic) -> Vec<String> {
        let mut lines = vec![format!("# {}", topic.title())];
        if !topic.description().is_empty() {
            lines.push(topic.description().to_string());
        }
        let closed = if topic.is_active() { "" } else { " (closed)" };
        lines.push(format!(
            "started by {} on {}{closed}",
            topic.created_by().username(),
            format_date(topic.created_at())
        ));
        lines
    }

    /// Renders the messages not printed yet. When the list no longer extends
    /// what was printed, everything is printed again.
    pub fn render_update(
        &mut self,
        messages: &[Message],
        local_user: UserId,
        copy: &mut CopyService,
        now: Instant,
    ) -> Vec<String> {
        let extends = messages.len() >= self.printed.len()
            && self
                .printed
                .iter()
                .zip(messages)
                .all(|(id, message)| *id == message.id());

        let mut lines = Vec::new();
        if !extends {
            lines.push("── reloaded ──".to_string());
            self.printed.clear();
        }
        let start = self.printed.len();

        self.truncation.retain(messages);
        let positions = group_positions(messages);
        for (i, (message, position)) in messages.iter().zip(positions).enumerate().skip(start) {
            let own = message.author_id() == local_user;
            lines.extend(self.render_message(i + 1, message, position, own, copy, now));
            self.printed.push(message.id());
        }

        self.rows += lines.len();
        lines
    }

    /// Flips expansion of message `index` (1-based) and renders it again.
    pub fn toggle(
        &mut self,
        messages: &[Message],
        index: usize,
        local_user: UserId,
        copy: &mut CopyService,
        now: Instant,
    ) -> Option<Vec<String>> {
        let message = messages.get(index.checked_sub(1)?)?;
        self.truncation.toggle(message.id());
        self.redraw(messages, index, local_user, copy, now)
    }

    /// Renders message `index` (1-based) again with its header.
    pub fn redraw(
        &mut self,
        messages: &[Message],
        index: usize,
        local_user: UserId,
        copy: &mut CopyService,
        now: Instant,
    ) -> Option<Vec<String>> {
        let message = messages.get(index.checked_sub(1)?)?;
        let standalone = GroupPosition {
            first_in_group: true,
            last_in_group: true,
        };
        let lines = self.render_message(
            index,
            message,
            standalone,
            message.author_id() == local_user,
            copy,
            now,
        );
        self.rows += lines.len();
        Some(lines)
    }

    fn render_message(
        &mut self,
        index: usize,
        message: &Message,
        position: GroupPosition,
        own: bool,
        copy: &mut CopyService,
        now: Instant,
    ) -> Vec<String> {
        let segments = self.cache.get_or_parse(message, &self.parser);
        copy.register_segments(&segments);

        let body_width = self.width.saturating_sub(GUTTER_WIDTH).max(MIN_BODY_WIDTH);
        let mut body = Vec::new();
        for segment in segments.iter() {
            match segment {
                ContentSegment::Text { html } => {
                    for line in markup_to_plain_text(html).split('\n') {
                        body.extend(wrap(line, body_width));
                    }
                }
                ContentSegment::Code(code) => {
                    let mark = if copy.is_copied(CopyTarget::Code(code.id), now) {
                        format!(" {COPIED_MARK}")
                    } else {
                        String::new()
                    };
                    body.push(format!(
                        "```{}  [code {index}.{}{mark}]",
                        code.language, code.id.position
                    ));
                    body.extend(code.raw_code.split('\n').map(str::to_string));
                    body.push("```".to_string());
                }
            }
        }

        let viewport_width = u32::try_from(self.width).unwrap_or(u32::MAX);
        let rendered_height = u32::try_from(body.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(ROW_HEIGHT_PX);
        if self.truncation.needs_measure(message, viewport_width) {
            self.truncation
                .record_measurement(message, viewport_width, rendered_height);
        }

        let mut footer = None;
        if self.truncation.is_collapsed(message.id()) {
            let visible = self.truncation.visible_height(message.id(), rendered_height) / ROW_HEIGHT_PX;
            body.truncate(usize::try_from(visible).unwrap_or(usize::MAX));
            footer = Some(format!("⋯ show more (/expand {index})"));
        } else if self.truncation.offers_expand(message.id()) {
            footer = Some(format!("⋯ show less (/expand {index})"));
        }

        if copy.is_copied(CopyTarget::Message(message.id()), now) {
            match body.first_mut() {
                Some(first) => {
                    first.push_str("  ");
                    first.push_str(COPIED_MARK);
                }
                None => body.push(COPIED_MARK.to_string()),
            }
        }

        let mut lines = Vec::with_capacity(body.len() + 2);
        if position.first_in_group {
            lines.push(format!(
                "{} · {}",
                message.user().username(),
                format_timestamp_now(message.created_at())
            ));
        }
        for (i, line) in body.iter().enumerate() {
            if i == 0 {
                lines.push(format!("{index:>3} │ {line}"));
            } else {
                lines.push(format!("    │ {line}"));
            }
        }
        if let Some(footer) = footer {
            lines.push(format!("    {footer}"));
        }

        if own {
            lines
                .into_iter()
                .map(|line| align_right(&line, self.width))
                .collect()
        } else {
            lines
        }
    }
}

/// Word-wraps `line` to `width` columns, splitting words longer than a row.
fn wrap(line: &str, width: usize) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }

    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split_inclusive(' ') {
        let word_width = word.trim_end().width();
        if current_width + word_width > width && !current.is_empty() {
            rows.push(current.trim_end().to_string());
            current.clear();
            current_width = 0;
        }

        if word_width > width {
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width && !current.is_empty() {
                    rows.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        } else {
            current.push_str(word);
            current_width += word.width();
        }
    }

    if !current.trim_end().is_empty() {
        rows.push(current.trim_end().to_string());
    }
    rows
}

fn align_right(line: &str, width: usize) -> String {
    let line_width = line.width();
    if line_width >= width {
        line.to_string()
    } else {
        format!("{}{line}", " ".repeat(width - line_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::{HighlightAdapter, NotificationManager};
    use crate::application::services::markup::code_block_markup;
    use crate::domain::User;
    use crate::domain::ports::mocks::{MockClipboard, MockEngine};
    use chrono::Utc;
    use std::sync::Arc;
    use std::time::Duration;

    fn transcript(width: usize) -> Transcript {
        let parser = ContentParser::new(HighlightAdapter::new(Arc::new(MockEngine::default())));
        Transcript::new(parser, &RoomSettings::default(), width)
    }

    fn copy() -> CopyService {
        CopyService::new(Arc::new(MockClipboard::new()), Duration::from_millis(2000))
    }

    fn msg(id: u64, content: &str, author: u64) -> Message {
        Message::new(id, content, User::new(author, format!("user{author}")), Utc::now())
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("hello world", 5), vec!["hello", "world"]);
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("fits here", 20), vec!["fits here"]);
    }

    #[test]
    fn test_group_header_only_on_first_message() {
        let mut transcript = transcript(80);
        let messages = vec![msg(1, "<p>a</p>", 2), msg(2, "<p>b</p>", 2)];
        let lines = transcript.render_update(&messages, UserId(1), &mut copy(), Instant::now());

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("user2 · "));
        assert_eq!(lines[1], "  1 │ a");
        assert_eq!(lines[2], "  2 │ b");
    }

    #[test]
    fn test_only_new_messages_are_rendered() {
        let mut transcript = transcript(80);
        let mut copy = copy();
        let mut messages = vec![msg(1, "<p>a</p>", 2)];
        transcript.render_update(&messages, UserId(1), &mut copy, Instant::now());

        messages.push(msg(2, "<p>b</p>", 3));
        let lines = transcript.render_update(&messages, UserId(1), &mut copy, Instant::now());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "  2 │ b");
        assert_eq!(transcript.rows(), 4);
    }

    #[test]
    fn test_replaced_list_is_reprinted() {
        let mut transcript = transcript(80);
        let mut copy = copy();
        transcript.render_update(&[msg(1, "<p>a</p>", 2)], UserId(1), &mut copy, Instant::now());

        let lines = transcript.render_update(&[msg(5, "<p>z</p>", 2)], UserId(1), &mut copy, Instant::now());
        assert_eq!(lines[0], "── reloaded ──");
        assert_eq!(lines[2], "  1 │ z");
    }

    #[test]
    fn test_code_block_is_fenced_and_copyable() {
        let mut transcript = transcript(80);
        let mut copy = copy();
        let content = format!("<p>look</p>{}", code_block_markup("def f():\n    pass"));
        let lines = transcript.render_update(&[msg(1, &content, 2)], UserId(1), &mut copy, Instant::now());

        assert_eq!(lines[2], "    │ ```python  [code 1.1]");
        assert_eq!(lines[4], "    │     pass");
    }

    #[test]
    fn test_own_messages_are_right_aligned() {
        let mut transcript = transcript(40);
        let lines = transcript.render_update(&[msg(1, "<p>mine</p>", 1)], UserId(1), &mut copy(), Instant::now());
        assert!(lines.iter().all(|line| line.width() == 40));
        assert!(lines[1].ends_with("  1 │ mine"));
    }

    #[test]
    fn test_long_message_collapses_and_expands() {
        let mut transcript = transcript(80);
        let mut copy = copy();
        // Twelve paragraphs render as 23 rows: each boundary adds a blank row.
        let content: String = (0..12).map(|i| format!("<p>line {i}</p>")).collect();
        let messages = vec![msg(1, &content, 2)];

        let lines = transcript.render_update(&messages, UserId(1), &mut copy, Instant::now());
        // header + 7 visible rows + footer
        assert_eq!(lines.len(), 9);
        assert_eq!(lines.last().unwrap(), "    ⋯ show more (/expand 1)");

        let lines = transcript
            .toggle(&messages, 1, UserId(1), &mut copy, Instant::now())
            .unwrap();
        assert_eq!(lines.len(), 25);
        assert_eq!(lines.last().unwrap(), "    ⋯ show less (/expand 1)");

        assert!(transcript.toggle(&messages, 2, UserId(1), &mut copy, Instant::now()).is_none());
        assert!(transcript.toggle(&messages, 0, UserId(1), &mut copy, Instant::now()).is_none());
    }

    #[tokio::test]
    async fn test_copied_marker_follows_feedback() {
        let mut transcript = transcript(80);
        let mut copy = copy();
        let mut notifications = NotificationManager::default();
        let messages = vec![msg(1, "<p>a</p>", 2)];
        transcript.render_update(&messages, UserId(1), &mut copy, Instant::now());

        assert!(copy.copy_message(&messages[0], &mut notifications).await);
        let now = Instant::now();
        let lines = transcript.redraw(&messages, 1, UserId(1), &mut copy, now).unwrap();
        assert_eq!(lines[1], "  1 │ a  ✓ copied");

        let later = now + Duration::from_millis(2001);
        let lines = transcript.redraw(&messages, 1, UserId(1), &mut copy, later).unwrap();
        assert_eq!(lines[1], "  1 │ a");
    }

    #[test]
    fn test_topic_header() {
        let topic = Topic::new(1, "Rust", "", User::new(1, "ada"), Utc::now()).with_active(false);
        let lines = Transcript::topic_header(&topic);
        assert_eq!(lines[0], "# Rust");
        assert!(lines[1].starts_with("started by ada on "));
        assert!(lines[1].ends_with(" (closed)"));
    }
}
