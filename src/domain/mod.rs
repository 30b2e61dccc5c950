//! Domain layer with core entities, value types and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Highlightable languages.
pub mod language;
/// Transient notifications.
pub mod notification;
/// Port definitions.
pub mod ports;
/// Parsed message segments.
pub mod segment;
/// Injected room configuration.
pub mod settings;

pub use entities::{Message, MessageId, Topic, TopicId, User, UserId};
pub use errors::{ApiError, ClipboardError, ErrorKind, HighlightError, RoomError};
pub use language::Language;
pub use notification::{Notification, NotificationLevel};
pub use ports::{ClipboardPort, HighlightEngine, RoomDataPort};
pub use segment::{CodeSegment, CodeSegmentId, ContentSegment};
pub use settings::RoomSettings;
