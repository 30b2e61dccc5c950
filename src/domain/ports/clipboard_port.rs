use async_trait::async_trait;

use crate::domain::errors::ClipboardError;

/// Port for the platform clipboard.
#[async_trait]
pub trait ClipboardPort: Send + Sync {
    /// Writes text to the clipboard.
    async fn write(&self, text: String) -> Result<(), ClipboardError>;
}
