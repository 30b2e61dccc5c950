mod clipboard_port;
mod highlight_engine;
mod room_data_port;

pub use clipboard_port::ClipboardPort;
pub use highlight_engine::HighlightEngine;
pub use room_data_port::RoomDataPort;

#[cfg(test)]
pub mod mocks {
    pub use super::clipboard_port::mock::MockClipboard;
    pub use super::highlight_engine::mock::MockEngine;
    pub use super::room_data_port::mock::MockRoomData;
}
