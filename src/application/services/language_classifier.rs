//! Heuristic language detection for code blocks.

use std::sync::LazyLock;

use regex::RegexSet;

use crate::domain::Language;

/// Pattern groups in priority order. The first group with any matching pattern wins.
static PATTERN_GROUPS: LazyLock<Vec<(Language, RegexSet)>> = LazyLock::new(|| {
    let groups: [(Language, &[&str]); 6] = [
        (Language::Jsx, &[r"import\s+React", r"jsx", r"<[\w\s]*>"]),
        (
            Language::JavaScript,
            &[r"function", r"const\s+", r"let\s+", r"=>"],
        ),
        (
            Language::TypeScript,
            &[r"interface\s+", r"type\s+[A-Z]", r"<[A-Z][^>]*>"],
        ),
        (Language::Python, &[r"def\s+", r"class\s+.*:"]),
        (Language::Json, &[r"^\s*[{\[]", r#""\w+"\s*:"#]),
        (Language::Css, &[r"\{[\s\S]*\};", r"(?i)\.[a-z]"]),
    ];

    groups
        .into_iter()
        .map(|(language, patterns)| {
            (
                language,
                RegexSet::new(patterns).expect("Invalid classifier pattern"),
            )
        })
        .collect()
});

/// Heuristic language detection for code blocks.
pub struct LanguageClassifier;

impl LanguageClassifier {
    /// Guesses the language of `source`. Falls back to the default language
    /// when nothing matches. Pure and deterministic.
    #[must_use]
    pub fn classify(source: &str) -> Language {
        PATTERN_GROUPS
            .iter()
            .find(|(_, patterns)| patterns.is_match(source))
            .map_or_else(Language::default, |(language, _)| *language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("import React from 'react';", Language::Jsx ; "react_import")]
    #[test_case("return <div>hi</div>", Language::Jsx ; "element")]
    #[test_case("function add(a, b) { return a + b }", Language::JavaScript ; "function")]
    #[test_case("const x = 1", Language::JavaScript ; "const")]
    #[test_case("xs.map(x => x * 2)", Language::JavaScript ; "arrow")]
    #[test_case("interface Props { name: string }", Language::TypeScript ; "interface")]
    #[test_case("type Id = string", Language::TypeScript ; "type_alias")]
    #[test_case("def greet(name):\n    print(name)", Language::Python ; "def")]
    #[test_case("class Greeter:\n    pass", Language::Python ; "class")]
    #[test_case("{\"name\": 1}", Language::Json ; "object")]
    #[test_case("  [1, 2, 3]", Language::Json ; "array")]
    #[test_case(".card { color: red; }", Language::Css ; "selector")]
    #[test_case("echo hello", Language::JavaScript ; "fallback")]
    fn test_classify(source: &str, expected: Language) {
        assert_eq!(LanguageClassifier::classify(source), expected);
    }

    #[test]
    fn test_priority_order() {
        // Matches both the jsx and javascript groups; jsx is tried first.
        assert_eq!(
            LanguageClassifier::classify("const el = <App />;\nconst x = <b>"),
            Language::Jsx
        );
    }

    #[test]
    fn test_classify_is_deterministic() {
        let source = "def run():\n    return {\"a\": 1}";
        let first = LanguageClassifier::classify(source);
        for _ in 0..5 {
            assert_eq!(LanguageClassifier::classify(source), first);
        }
    }
}
