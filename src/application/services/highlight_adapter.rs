//! Failure-absorbing front of the highlighting engine.

use std::sync::Arc;

use tracing::{debug, warn};

use super::markup::escape_html;
use crate::domain::{HighlightEngine, Language};

/// Wraps the highlighting engine so that rendering never fails because of it.
pub struct HighlightAdapter {
    engine: Arc<dyn HighlightEngine>,
}

impl HighlightAdapter {
    /// Wraps `engine`.
    #[must_use]
    pub fn new(engine: Arc<dyn HighlightEngine>) -> Self {
        Self { engine }
    }

    /// Returns `<pre><code class="language-*">` markup for `code`.
    ///
    /// Uses the default grammar when `language` has none. On engine failure the
    /// code is escaped and returned unhighlighted, still tagged with `language`.
    #[must_use]
    pub fn highlight(&self, code: &str, language: Language) -> String {
        let grammar = if self.engine.has_grammar(language) {
            language
        } else {
            debug!(language = %language, "No grammar bundled, using default");
            Language::default()
        };

        match self.engine.highlight(code, grammar) {
            Ok(inner) => code_container(language, &inner),
            Err(e) => {
                warn!(language = %language, error = %e, "Syntax highlighting failed");
                code_container(language, &escape_html(code))
            }
        }
    }
}

fn code_container(language: Language, inner: &str) -> String {
    format!("<pre><code class=\"language-{language}\">{inner}</code></pre>")
}
