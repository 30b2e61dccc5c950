//! Domain entity definitions.

mod message;
mod topic;
mod user;

pub use message::{GroupPosition, Message, MessageId, group_positions};
pub use topic::{Topic, TopicId};
pub use user::{User, UserId};
