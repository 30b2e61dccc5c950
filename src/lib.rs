//! Threadroom - a terminal client for topic-based discussion rooms.
//!
//! This crate keeps one topic's message feed in sync by polling, renders
//! message markup with highlighted code blocks, and sends new messages
//! through a line-oriented compose control.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the room session and content pipeline.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing the terminal room.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "threadroom";
