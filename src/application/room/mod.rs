mod events;
mod poll_task;
mod session;

pub use events::{RoomEvent, SessionTag};
pub use poll_task::PollTask;
pub use session::{FetchPhase, RoomSession, RoomUpdate, SyncState};
