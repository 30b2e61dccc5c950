//! Infrastructure layer with external service adapters.

/// Discussion server REST client.
pub mod api;
/// Platform clipboard.
pub mod clipboard;
/// Application configuration.
pub mod config;
/// Syntax highlighting engine.
pub mod highlight;

pub use api::RestRoomClient;
pub use clipboard::SystemClipboard;
pub use config::{AppConfig, CliArgs, LogLevel, StateConfig, StorageManager};
pub use highlight::SyntectEngine;
