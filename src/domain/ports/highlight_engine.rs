use crate::domain::errors::HighlightError;
use crate::domain::language::Language;

/// External syntax highlighting engine: a pure `(code, grammar) -> markup` function.
pub trait HighlightEngine: Send + Sync {
    /// Whether a grammar is bundled for `language`.
    fn has_grammar(&self, language: Language) -> bool;

    /// Highlights `code` with the grammar of `language`, returning inner markup
    /// (no surrounding container).
    fn highlight(&self, code: &str, language: Language) -> Result<String, HighlightError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Wraps code in a marker span and records the grammar used.
    #[derive(Default)]
    pub struct MockEngine {
        pub missing: Vec<Language>,
        pub fail: bool,
        pub calls: Mutex<Vec<Language>>,
    }

    impl HighlightEngine for MockEngine {
        fn has_grammar(&self, language: Language) -> bool {
            !self.missing.contains(&language)
        }

        fn highlight(&self, code: &str, language: Language) -> Result<String, HighlightError> {
            self.calls.lock().unwrap().push(language);
            if self.fail {
                return Err(HighlightError::Engine("boom".to_string()));
            }
            Ok(format!("<span class=\"hl-{language}\">{code}</span>"))
        }
    }
}
