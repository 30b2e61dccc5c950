//! `syntect` adapter emitting class-based HTML.

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::domain::{HighlightEngine, HighlightError, Language};

/// Blocks above this size are refused; the adapter renders them escaped.
const MAX_HIGHLIGHT_BYTES: usize = 512 * 1024;

/// Highlighter over syntect's bundled grammars.
pub struct SyntectEngine {
    syntax_set: SyntaxSet,
}

impl Default for SyntectEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntectEngine {
    /// Loads the default syntax set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Bundled grammar token, if the default set has one.
    const fn token(language: Language) -> Option<&'static str> {
        match language {
            Language::JavaScript => Some("js"),
            Language::Python => Some("py"),
            Language::Json => Some("json"),
            Language::Css => Some("css"),
            Language::Jsx | Language::TypeScript => None,
        }
    }

    fn syntax(&self, language: Language) -> Option<&SyntaxReference> {
        Self::token(language).and_then(|token| self.syntax_set.find_syntax_by_token(token))
    }
}

impl HighlightEngine for SyntectEngine {
    fn has_grammar(&self, language: Language) -> bool {
        self.syntax(language).is_some()
    }

    fn highlight(&self, code: &str, language: Language) -> Result<String, HighlightError> {
        if code.len() > MAX_HIGHLIGHT_BYTES {
            return Err(HighlightError::InputTooLarge { size: code.len() });
        }
        let syntax = self
            .syntax(language)
            .ok_or_else(|| HighlightError::MissingGrammar(language.to_string()))?;

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| HighlightError::Engine(e.to_string()))?;
        }
        Ok(generator.finalize())
    }
}
