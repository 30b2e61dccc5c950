use thiserror::Error;

/// Platform clipboard failure. Reported as a transient notification only.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("failed to write clipboard: {0}")]
    WriteFailed(String),

    #[error("nothing to copy for {0}")]
    UnknownTarget(String),
}
