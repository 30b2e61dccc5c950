use thiserror::Error;

/// Highlighting engine failure. Never surfaced to the user.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum HighlightError {
    #[error("no grammar available for {0}")]
    MissingGrammar(String),

    #[error("input too large to highlight: {size} bytes")]
    InputTooLarge { size: usize },

    #[error("highlighting engine error: {0}")]
    Engine(String),
}
