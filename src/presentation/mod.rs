//! Presentation layer: the line-oriented terminal room.

/// Room event loop.
pub mod app;
/// Slash commands and message composition.
pub mod commands;
/// Transcript rendering.
pub mod transcript;

pub use app::App;
