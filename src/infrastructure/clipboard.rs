use arboard::Clipboard;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::{ClipboardError, ClipboardPort};

/// Platform clipboard through `arboard`. Each write opens a fresh handle on
/// the blocking pool.
#[derive(Clone, Default)]
pub struct SystemClipboard {}

impl SystemClipboard {
    /// Creates the adapter. No clipboard handle is opened yet.
    #[must_use]
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl ClipboardPort for SystemClipboard {
    async fn write(&self, text: String) -> Result<(), ClipboardError> {
        let len = text.len();
        let result = tokio::task::spawn_blocking(move || {
            let mut clipboard = Clipboard::new().map_err(|e| {
                warn!("Failed to initialize clipboard for copy: {}", e);
                ClipboardError::Unavailable(e.to_string())
            })?;
            clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
        })
        .await
        .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;

        if result.is_ok() {
            debug!(len, "Clipboard text set");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_reports_instead_of_panicking() {
        // Headless CI has no clipboard; either outcome is acceptable.
        let result = SystemClipboard::new().write("test".to_string()).await;
        assert!(result.is_ok() || result.is_err());
    }
}
