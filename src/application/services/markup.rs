//! Editor markup helpers: entity coding, tag stripping and the serialization
//! conventions of the rich-text editor.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Opening tag of the editor's code-block convention.
pub const CODE_BLOCK_OPEN: &str = r#"<pre class="ql-syntax" spellcheck="false">"#;
/// Closing tag of the editor's code-block convention.
pub const CODE_BLOCK_CLOSE: &str = "</pre>";

const NBSP: char = '\u{00A0}';

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(lt|gt|amp|quot|#x27|#39|nbsp);").expect("Invalid regex"));

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid regex"));

static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("Invalid regex"));

static PARAGRAPH_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p><p>").expect("Invalid regex"));

/// Escapes the code-block entity set: `< > & " '` and non-breaking space.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            NBSP => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Decodes the code-block entity set in a single pass, so `&amp;lt;` yields
/// `&lt;` rather than `<`. `&nbsp;` decodes to U+00A0.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITY_RE
        .replace_all(text, |caps: &Captures<'_>| match &caps[1] {
            "lt" => "<",
            "gt" => ">",
            "amp" => "&",
            "quot" => "\"",
            "#x27" | "#39" => "'",
            _ => "\u{00A0}",
        })
        .into_owned()
}

/// Decodes the escaped body of an editor code block into source text.
/// Non-breaking spaces are the editor's way of keeping indentation, so they
/// become ordinary spaces.
#[must_use]
pub fn decode_code_text(escaped: &str) -> String {
    decode_entities(escaped).replace(NBSP, " ")
}

/// Removes every tag, keeping text between them.
#[must_use]
pub fn strip_tags(markup: &str) -> String {
    TAG_RE.replace_all(markup, "").into_owned()
}

/// Text content of a markup fragment: tags removed, entities decoded.
#[must_use]
pub fn text_content(markup: &str) -> String {
    decode_entities(&strip_tags(markup))
}

/// Converts message markup to clean plain text: line breaks become `\n`,
/// paragraph boundaries `\n\n`, remaining tags are dropped and entities decoded.
#[must_use]
pub fn markup_to_plain_text(markup: &str) -> String {
    let text = LINE_BREAK_RE.replace_all(markup, "\n");
    let text = PARAGRAPH_BREAK_RE.replace_all(&text, "\n\n");
    decode_entities(&strip_tags(&text)).replace(NBSP, " ")
}

/// Serializes source text with the editor's code-block convention.
#[must_use]
pub fn code_block_markup(source: &str) -> String {
    format!("{CODE_BLOCK_OPEN}{}{CODE_BLOCK_CLOSE}", escape_html(source))
}

/// Serializes plain text as editor paragraphs, one per line.
#[must_use]
pub fn paragraph_markup(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                "<p><br></p>".to_string()
            } else {
                format!("<p>{}</p>", escape_html(line))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("" ; "empty")]
    #[test_case("a < b && c > d" ; "operators")]
    #[test_case(r#"say "hi" it's"# ; "quotes")]
    #[test_case("&lt; already escaped &amp;" ; "entity_lookalikes")]
    #[test_case("\u{00A0}\u{00A0}indented" ; "nbsp")]
    #[test_case("<div class='x'>&nbsp;</div>" ; "markup")]
    fn test_entity_round_trip(source: &str) {
        assert_eq!(decode_entities(&escape_html(source)), source);
    }

    #[test]
    fn test_decode_is_single_pass() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("&#39;&#x27;"), "''");
    }

    #[test]
    fn test_decode_code_text_maps_nbsp_to_space() {
        assert_eq!(decode_code_text("&nbsp;&nbsp;x&nbsp;=&nbsp;1"), "  x = 1");
    }

    #[test]
    fn test_markup_to_plain_text() {
        let markup = "<p>Hello <strong>there</strong></p><p>line&nbsp;one<br>line two</p>";
        assert_eq!(
            markup_to_plain_text(markup),
            "Hello there\n\nline one\nline two"
        );
    }

    #[test]
    fn test_markup_to_plain_text_decodes_entities() {
        assert_eq!(markup_to_plain_text("<p>a &lt;b&gt; &amp; &quot;c&quot;</p>"), "a <b> & \"c\"");
    }

    #[test]
    fn test_paragraph_markup() {
        assert_eq!(
            paragraph_markup("one\n\n<two>"),
            "<p>one</p><p><br></p><p>&lt;two&gt;</p>"
        );
    }

    #[test]
    fn test_code_block_markup_uses_editor_convention() {
        assert_eq!(
            code_block_markup("if a < b {}"),
            r#"<pre class="ql-syntax" spellcheck="false">if a &lt; b {}</pre>"#
        );
    }
}
