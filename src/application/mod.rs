//! Application layer: the content pipeline and the room session.

/// Room synchronization and send lifecycle.
pub mod room;
/// Content pipeline and view-state services.
pub mod services;

pub use room::{FetchPhase, RoomEvent, RoomSession, RoomUpdate, SyncState};
pub use services::{ContentParser, CopyService, HighlightAdapter, NotificationManager, SegmentCache};
