//! Splits message markup into text and highlighted code segments.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::highlight_adapter::HighlightAdapter;
use super::language_classifier::LanguageClassifier;
use super::markup::decode_code_text;
use crate::domain::entities::MessageId;
use crate::domain::{CodeSegment, CodeSegmentId, ContentSegment};

/// The editor's code-block convention. Must stay bit-compatible with the editor.
static CODE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<pre class="ql-syntax" spellcheck="false">(.*?)</pre>"#)
        .expect("Invalid regex")
});

static NESTED_PRE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<pre[\s>]").expect("Invalid regex"));

/// Splits message markup into text and highlighted code segments.
pub struct ContentParser {
    highlighter: HighlightAdapter,
}

impl ContentParser {
    /// Creates a parser that highlights through `highlighter`.
    #[must_use]
    pub fn new(highlighter: HighlightAdapter) -> Self {
        Self { highlighter }
    }

    /// Parses raw markup into ordered segments. Total: anything that is not a
    /// well-formed code block comes back as text, unchanged.
    #[must_use]
    pub fn parse(&self, message_id: MessageId, raw: &str) -> Vec<ContentSegment> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for caps in CODE_BLOCK_RE.captures_iter(raw) {
            let (Some(block), Some(body)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            push_text(&mut segments, &raw[cursor..block.start()]);
            cursor = block.end();

            if NESTED_PRE_RE.is_match(body.as_str()) {
                debug!(message_id = %message_id, "Malformed code block, keeping as text");
                push_text(&mut segments, block.as_str());
                continue;
            }

            let raw_code = decode_code_text(body.as_str());
            let language = LanguageClassifier::classify(&raw_code);
            let highlighted_html = self.highlighter.highlight(&raw_code, language);

            segments.push(ContentSegment::Code(CodeSegment {
                id: CodeSegmentId::new(message_id, segments.len()),
                raw_code,
                language,
                highlighted_html,
            }));
        }

        push_text(&mut segments, &raw[cursor..]);
        segments
    }
}

/// Appends text, merging with a preceding text segment.
fn push_text(segments: &mut Vec<ContentSegment>, html: &str) {
    if html.is_empty() {
        return;
    }
    if let Some(ContentSegment::Text { html: previous }) = segments.last_mut() {
        previous.push_str(html);
    } else {
        segments.push(ContentSegment::text(html));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::markup::code_block_markup;
    use crate::domain::Language;
    use crate::domain::ports::mocks::MockEngine;
    use std::sync::Arc;

    fn parser() -> ContentParser {
        ContentParser::new(HighlightAdapter::new(Arc::new(MockEngine::default())))
    }

    #[test]
    fn test_plain_text_is_single_segment() {
        let segments = parser().parse(MessageId(1), "<p>hello</p>");
        assert_eq!(segments, vec![ContentSegment::text("<p>hello</p>")]);
    }

    #[test]
    fn test_empty_content_has_no_segments() {
        assert!(parser().parse(MessageId(1), "").is_empty());
    }

    #[test]
    fn test_code_block_between_text() {
        let raw = format!(
            "<p>before</p>{}<p>after</p>",
            code_block_markup("def f(x):\n    return x < 1")
        );
        let segments = parser().parse(MessageId(9), &raw);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], ContentSegment::text("<p>before</p>"));
        assert_eq!(segments[2], ContentSegment::text("<p>after</p>"));

        let code = segments[1].as_code().unwrap();
        assert_eq!(code.id, CodeSegmentId::new(MessageId(9), 1));
        assert_eq!(code.id.to_string(), "code-9-1");
        assert_eq!(code.raw_code, "def f(x):\n    return x < 1");
        assert_eq!(code.language, Language::Python);
        assert!(
            code.highlighted_html
                .starts_with("<pre><code class=\"language-python\">")
        );
    }

    #[test]
    fn test_adjacent_code_blocks_keep_positions() {
        let raw = format!("{}{}", code_block_markup("{\"a\": 1}"), code_block_markup(".x { }"));
        let segments = parser().parse(MessageId(2), &raw);

        let ids: Vec<_> = segments
            .iter()
            .filter_map(|s| s.as_code().map(|c| c.id.position))
            .collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(segments[0].as_code().unwrap().language, Language::Json);
        assert_eq!(segments[1].as_code().unwrap().language, Language::Css);
    }

    #[test]
    fn test_nbsp_indentation_is_decoded() {
        let raw = r#"<pre class="ql-syntax" spellcheck="false">if x:&nbsp;
&nbsp;&nbsp;&nbsp;&nbsp;pass</pre>"#;
        let segments = parser().parse(MessageId(3), raw);
        assert_eq!(segments[0].as_code().unwrap().raw_code, "if x: \n    pass");
    }

    #[test]
    fn test_unterminated_block_degrades_to_text() {
        let raw = r#"<p>hi</p><pre class="ql-syntax" spellcheck="false">const x = 1"#;
        let segments = parser().parse(MessageId(4), raw);
        assert_eq!(segments, vec![ContentSegment::text(raw)]);
    }

    #[test]
    fn test_nested_pre_degrades_to_text() {
        let raw = r#"<p>a</p><pre class="ql-syntax" spellcheck="false"><pre>x</pre>"#;
        let segments = parser().parse(MessageId(5), raw);
        assert_eq!(segments, vec![ContentSegment::text(raw)]);
    }

    #[test]
    fn test_other_pre_elements_are_text() {
        let raw = "<pre>plain preformatted</pre>";
        let segments = parser().parse(MessageId(6), raw);
        assert_eq!(segments, vec![ContentSegment::text(raw)]);
    }
}
