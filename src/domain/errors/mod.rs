//! Domain error types.

mod api_error;
mod clipboard_error;
mod highlight_error;
mod room_error;

pub use api_error::ApiError;
pub use clipboard_error::ClipboardError;
pub use highlight_error::HighlightError;
pub use room_error::{ErrorKind, RoomError};
