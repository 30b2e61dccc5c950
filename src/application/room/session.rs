//! One topic room: feed synchronization, the send lifecycle and scroll
//! arbitration on list growth.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use super::events::{RoomEvent, SessionTag};
use super::poll_task::PollTask;
use crate::application::services::{GrowthOutcome, ScrollController};
use crate::domain::{ApiError, Message, RoomDataPort, RoomError, RoomSettings, Topic, TopicId, User};

/// Fetch lifecycle of the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchPhase {
    /// Last fetch succeeded, or none started.
    #[default]
    Idle,
    /// A user-visible fetch is in flight.
    Fetching,
    /// Last fetch failed. Polling goes on.
    Error,
}

/// Synchronization bookkeeping. Reset whenever the topic changes.
///
/// Each error source has its own slot, cleared only by a success of the
/// same source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    /// Length of the last applied feed.
    pub last_known_count: usize,
    /// A send is in flight.
    pub is_sending: bool,
    /// Topic metadata could not be fetched.
    pub topic_error: Option<RoomError>,
    /// The last feed fetch failed.
    pub feed_error: Option<RoomError>,
    /// The last send failed. The draft is still there.
    pub send_error: Option<RoomError>,
}

impl SyncState {
    /// The error to show first: send, then topic, then feed.
    #[must_use]
    pub fn last_error(&self) -> Option<&RoomError> {
        self.errors().next()
    }

    /// All current errors, most relevant first.
    pub fn errors(&self) -> impl Iterator<Item = &RoomError> {
        [&self.send_error, &self.topic_error, &self.feed_error]
            .into_iter()
            .flatten()
    }
}

/// What a handled event changed, for the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomUpdate {
    /// Topic metadata arrived.
    pub topic_changed: bool,
    /// The message list was replaced.
    pub messages_changed: bool,
    /// How the scroll position reacted to a longer list.
    pub growth: Option<GrowthOutcome>,
    /// An error slot was set or cleared.
    pub error_changed: bool,
    /// A send of this room completed.
    pub send_finished: bool,
}

impl RoomUpdate {
    /// Nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The open room: topic, feed, draft and scroll state of one topic at a time.
pub struct RoomSession {
    port: Arc<dyn RoomDataPort>,
    settings: RoomSettings,
    local_user: User,
    generation: u64,
    tag: Option<SessionTag>,
    topic: Option<Topic>,
    messages: Vec<Message>,
    sync: SyncState,
    phase: FetchPhase,
    draft: String,
    scroll: ScrollController,
    poller: Option<PollTask>,
    events_tx: mpsc::UnboundedSender<RoomEvent>,
    events_rx: mpsc::UnboundedReceiver<RoomEvent>,
}

impl RoomSession {
    /// Creates an unbound session. Call [`RoomSession::enter`] to join a topic.
    #[must_use]
    pub fn new(port: Arc<dyn RoomDataPort>, settings: RoomSettings, local_user: User) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let scroll = ScrollController::new(&settings);
        Self {
            port,
            settings,
            local_user,
            generation: 0,
            tag: None,
            topic: None,
            messages: Vec::new(),
            sync: SyncState::default(),
            phase: FetchPhase::Idle,
            draft: String::new(),
            scroll,
            poller: None,
            events_tx,
            events_rx,
        }
    }

    /// Binds the session to `topic_id`: stops the previous cycle, resets room
    /// state, fetches topic and feed independently and starts polling.
    /// The draft is kept, and so is the sending flag until an in-flight
    /// send of the previous topic completes.
    pub fn enter(&mut self, topic_id: TopicId) {
        self.stop_polling();

        self.generation += 1;
        let tag = SessionTag {
            topic_id,
            generation: self.generation,
        };
        self.tag = Some(tag);
        self.topic = None;
        self.messages.clear();
        self.sync = SyncState {
            is_sending: self.sync.is_sending,
            ..SyncState::default()
        };
        self.phase = FetchPhase::Fetching;
        self.scroll.reset();

        info!(topic_id = %topic_id, generation = tag.generation, "Entering room");

        self.spawn_topic_fetch(tag);
        self.spawn_feed_fetch(tag);
        self.poller = Some(PollTask::start(
            self.port.clone(),
            tag,
            self.settings.poll_interval(),
            self.events_tx.clone(),
        ));
    }

    /// Unbinds the session. Pending results for the old topic are dropped.
    pub fn leave(&mut self) {
        self.stop_polling();
        if let Some(tag) = self.tag.take() {
            info!(topic_id = %tag.topic_id, "Leaving room");
        }
    }

    /// Fetches the topic metadata again.
    pub fn refresh_topic(&mut self) {
        if let Some(tag) = self.tag {
            self.spawn_topic_fetch(tag);
        }
    }

    /// Fetches the feed now instead of waiting for the next tick.
    pub fn refresh_feed(&mut self) {
        if let Some(tag) = self.tag {
            self.phase = FetchPhase::Fetching;
            self.spawn_feed_fetch(tag);
        }
    }

    /// Replaces the compose text.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Submits the draft. A no-op (returning false) while a send is in flight,
    /// when the draft is blank or when no topic is bound.
    pub fn send(&mut self) -> bool {
        let Some(tag) = self.tag else {
            return false;
        };
        if self.sync.is_sending || self.draft.trim().is_empty() {
            trace!("Send ignored");
            return false;
        }

        self.sync.is_sending = true;
        let content = self.draft.clone();
        let port = self.port.clone();
        let events = self.events_tx.clone();

        tokio::spawn(async move {
            let result = port.send_message(tag.topic_id, &content).await;
            let refreshed = if result.is_ok() {
                Some(port.fetch_messages(tag.topic_id).await)
            } else {
                None
            };
            let _ = events.send(RoomEvent::SendFinished {
                tag,
                content,
                result,
                refreshed,
            });
        });
        true
    }

    /// Waits for the next background completion.
    pub async fn next_event(&mut self) -> Option<RoomEvent> {
        self.events_rx.recv().await
    }

    /// Applies one completion to the room state.
    pub fn handle_event(&mut self, event: RoomEvent) -> RoomUpdate {
        let mut update = RoomUpdate::default();
        if self.tag != Some(event.tag()) {
            if let RoomEvent::SendFinished {
                content, result, ..
            } = &event
            {
                self.finish_superseded_send(content, result.is_ok());
            }
            debug!(topic_id = %event.tag().topic_id, generation = event.tag().generation, "Dropping stale room event");
            return update;
        }

        match event {
            RoomEvent::TopicLoaded { result, .. } => self.apply_topic(result, &mut update),
            RoomEvent::FeedLoaded { result, .. } => self.apply_feed(result, &mut update),
            RoomEvent::SendFinished {
                result, refreshed, ..
            } => {
                self.sync.is_sending = false;
                update.send_finished = true;
                match result {
                    Ok(message) => {
                        info!(message_id = %message.id(), "Message sent");
                        self.draft.clear();
                        if self.sync.send_error.take().is_some() {
                            update.error_changed = true;
                        }
                        if let Some(feed) = refreshed {
                            self.apply_feed(feed, &mut update);
                        }
                        self.scroll.scroll_to_bottom();
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to send message");
                        self.sync.send_error = Some(RoomError::Send(e));
                        update.error_changed = true;
                    }
                }
            }
        }
        update
    }

    /// Topic the session is bound to.
    #[must_use]
    pub fn topic_id(&self) -> Option<TopicId> {
        self.tag.map(|tag| tag.topic_id)
    }

    /// Topic metadata, once loaded.
    #[must_use]
    pub const fn topic(&self) -> Option<&Topic> {
        self.topic.as_ref()
    }

    /// Last applied feed.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Sync bookkeeping and error slots.
    #[must_use]
    pub const fn sync(&self) -> &SyncState {
        &self.sync
    }

    /// Feed fetch lifecycle.
    #[must_use]
    pub const fn phase(&self) -> FetchPhase {
        self.phase
    }

    /// Current compose text.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// The signed-in user.
    #[must_use]
    pub const fn local_user(&self) -> &User {
        &self.local_user
    }

    /// Injected room configuration.
    #[must_use]
    pub const fn settings(&self) -> &RoomSettings {
        &self.settings
    }

    /// Whether `message` was written by the local user.
    #[must_use]
    pub fn is_own(&self, message: &Message) -> bool {
        message.author_id() == self.local_user.id()
    }

    /// Scroll state of the message list.
    #[must_use]
    pub const fn scroll(&self) -> &ScrollController {
        &self.scroll
    }

    /// Mutable scroll state, for the renderer to report metrics.
    pub fn scroll_mut(&mut self) -> &mut ScrollController {
        &mut self.scroll
    }

    /// The recurring feed fetch is running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(PollTask::is_running)
    }

    fn apply_topic(&mut self, result: Result<Topic, ApiError>, update: &mut RoomUpdate) {
        match result {
            Ok(topic) => {
                debug!(topic_id = %topic.id(), "Topic loaded");
                self.topic = Some(topic);
                update.topic_changed = true;
                if self.sync.topic_error.take().is_some() {
                    update.error_changed = true;
                }
            }
            Err(e) => {
                warn!(topic_id = ?self.topic_id(), error = %e, "Failed to fetch topic");
                self.sync.topic_error = Some(RoomError::FetchTopic(e));
                update.error_changed = true;
            }
        }
    }

    /// Count gate: the list is replaced only when the number of messages
    /// differs. Same-count edits are not detected.
    fn apply_feed(&mut self, result: Result<Vec<Message>, ApiError>, update: &mut RoomUpdate) {
        let messages = match result {
            Ok(messages) => messages,
            Err(e) => {
                warn!(topic_id = ?self.topic_id(), error = %e, "Failed to fetch messages");
                self.phase = FetchPhase::Error;
                self.sync.feed_error = Some(RoomError::FetchFeed(e));
                update.error_changed = true;
                return;
            }
        };

        self.phase = FetchPhase::Idle;
        if self.sync.feed_error.take().is_some() {
            update.error_changed = true;
        }

        if messages.len() == self.sync.last_known_count {
            trace!(count = messages.len(), "Feed unchanged");
            return;
        }

        let grew = messages.len() > self.sync.last_known_count;
        let newest_by_local_user = messages.last().is_some_and(|m| self.is_own(m));
        debug!(
            previous = self.sync.last_known_count,
            count = messages.len(),
            "Feed changed"
        );

        self.sync.last_known_count = messages.len();
        self.messages = messages;
        update.messages_changed = true;

        if grew {
            update.growth = Some(self.scroll.on_messages_grew(newest_by_local_user));
        }
    }

    /// A send started before the last topic switch completed. A delivered
    /// draft is cleared so it cannot be posted again in the new topic.
    fn finish_superseded_send(&mut self, content: &str, delivered: bool) {
        self.sync.is_sending = false;
        if delivered {
            info!("Message sent to a previous topic");
            if self.draft == content {
                self.draft.clear();
            }
        } else {
            warn!("Send to a previous topic failed");
        }
    }

    fn spawn_topic_fetch(&self, tag: SessionTag) {
        let port = self.port.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = port.fetch_topic(tag.topic_id).await;
            let _ = events.send(RoomEvent::TopicLoaded { tag, result });
        });
    }

    fn spawn_feed_fetch(&self, tag: SessionTag) {
        let port = self.port.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = port.fetch_messages(tag.topic_id).await;
            let _ = events.send(RoomEvent::FeedLoaded { tag, result });
        });
    }

    fn stop_polling(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }
}

impl Drop for RoomSession {
    fn drop(&mut self) {
        self.leave();
    }
}
