//! Closed set of languages the highlighter knows about.

use serde::{Deserialize, Serialize};

/// Language tag attached to a code segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Markup-aware scripting variant.
    Jsx,
    /// General-purpose scripting language; the fallback tag.
    #[default]
    JavaScript,
    /// Statically-typed scripting variant.
    TypeScript,
    /// Dynamically-typed scripting language.
    Python,
    /// Data-interchange format.
    Json,
    /// Stylesheet language.
    Css,
}

impl Language {
    /// Tag used in `language-*` classes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jsx => "jsx",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Python => "python",
            Self::Json => "json",
            Self::Css => "css",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
