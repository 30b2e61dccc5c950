//! Terminal room loop: stdin in, transcript out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::time::interval;
use tracing::{debug, info};

use super::commands::{Command, ComposeStep, Composer, HELP};
use super::transcript::{ROW_HEIGHT_PX, Transcript};
use crate::application::services::ScrollMetrics;
use crate::application::{
    ContentParser, CopyService, HighlightAdapter, NotificationManager, RoomSession, RoomUpdate,
};
use crate::domain::{
    ClipboardPort, CodeSegmentId, ErrorKind, HighlightEngine, Message, NotificationLevel,
    RoomDataPort, RoomError, RoomSettings, TopicId, User,
};

const UI_TICK: Duration = Duration::from_millis(250);
const VIEWPORT_ROWS: u32 = 24;
const DEFAULT_WIDTH: usize = 80;

/// Terminal front end of one room session.
pub struct App {
    session: RoomSession,
    transcript: Transcript,
    copy: CopyService,
    notifications: NotificationManager,
    composer: Composer,
    shown_errors: Vec<RoomError>,
    output: Vec<String>,
    running: bool,
}

impl App {
    /// Wires the room to its collaborators.
    #[must_use]
    pub fn new(
        port: Arc<dyn RoomDataPort>,
        engine: Arc<dyn HighlightEngine>,
        clipboard: Arc<dyn ClipboardPort>,
        settings: RoomSettings,
        local_user: User,
    ) -> Self {
        let parser = ContentParser::new(HighlightAdapter::new(engine));
        Self {
            transcript: Transcript::new(parser, &settings, terminal_width()),
            copy: CopyService::new(clipboard, settings.copy_feedback()),
            notifications: NotificationManager::new(settings.notification_duration()),
            session: RoomSession::new(port, settings, local_user),
            composer: Composer::new(),
            shown_errors: Vec::new(),
            output: Vec::new(),
            running: true,
        }
    }

    /// Runs until `/quit` or end of input. Returns the topic that was open.
    ///
    /// # Errors
    /// Returns error if stdin or stdout fail.
    pub async fn run(mut self, topic_id: TopicId) -> color_eyre::Result<Option<TopicId>> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();
        let mut ticker = interval(UI_TICK);

        self.enter(topic_id);
        self.flush(&mut stdout).await?;

        while self.running {
            tokio::select! {
                Some(event) = self.session.next_event() => {
                    let update = self.session.handle_event(event);
                    self.apply_update(&update);
                }

                line = lines.next_line() => {
                    match line? {
                        Some(line) => self.handle_line(&line).await,
                        None => {
                            info!("Input closed");
                            self.running = false;
                        }
                    }
                }

                _ = ticker.tick() => self.tick(Instant::now()),
            }

            self.flush(&mut stdout).await?;
        }

        let last_topic = self.session.topic_id();
        self.session.leave();
        info!("Application exiting normally");
        Ok(last_topic)
    }

    fn enter(&mut self, topic_id: TopicId) {
        self.transcript.reset();
        self.copy.reset();
        self.shown_errors.clear();
        self.session.enter(topic_id);
        self.output.push(format!("joining topic {topic_id}…"));
    }

    fn apply_update(&mut self, update: &RoomUpdate) {
        if update.topic_changed {
            if let Some(topic) = self.session.topic() {
                self.output.extend(Transcript::topic_header(topic));
            }
        }
        if update.messages_changed {
            let local = self.session.local_user().id();
            let lines = self.transcript.render_update(
                self.session.messages(),
                local,
                &mut self.copy,
                Instant::now(),
            );
            self.output.extend(lines);
        }
        if update.error_changed {
            self.show_error();
        }
        self.follow_output();
    }

    /// Prints errors that appeared since the last call, or a recovery line
    /// once none are left.
    fn show_error(&mut self) {
        let current: Vec<RoomError> = self.session.sync().errors().cloned().collect();
        for error in current.iter().filter(|e| !self.shown_errors.contains(e)) {
            if error.kind() == ErrorKind::SendFailure {
                self.output
                    .push(format!("! {} (/retry to resend)", error.user_message()));
            } else {
                self.output.push(format!("! {}", error.user_message()));
            }
        }
        if current.is_empty() && !self.shown_errors.is_empty() {
            self.output.push("✓ back in sync".to_string());
        }
        self.shown_errors = current;
    }

    /// The terminal always shows the newest output, so the list is at the bottom.
    fn follow_output(&mut self) {
        let content_height = u32::try_from(self.transcript.rows())
            .unwrap_or(u32::MAX)
            .saturating_mul(ROW_HEIGHT_PX);
        let viewport_height = VIEWPORT_ROWS * ROW_HEIGHT_PX;
        let scroll = self.session.scroll_mut();
        scroll.take_scroll_request();
        scroll.observe(ScrollMetrics {
            offset: content_height.saturating_sub(viewport_height),
            content_height,
            viewport_height,
        });
    }

    async fn handle_line(&mut self, line: &str) {
        match self.composer.feed(line) {
            ComposeStep::Pending => {}
            ComposeStep::Ready(markup) => {
                if self.session.sync().is_sending {
                    self.output
                        .push("! still sending the previous message".to_string());
                } else {
                    self.session.set_draft(markup);
                    self.session.send();
                }
            }
            ComposeStep::Command(command) => self.execute(command).await,
            ComposeStep::Invalid(e) => self.output.push(format!("! {e}")),
        }
    }

    async fn execute(&mut self, command: Command) {
        debug!(?command, "Executing command");
        match command {
            Command::Copy { index } => {
                let Some(message) = message_at(self.session.messages(), index) else {
                    self.output.push(format!("! no message {index}"));
                    return;
                };
                if self.copy.copy_message(message, &mut self.notifications).await {
                    self.redraw(index);
                }
            }
            Command::CopyCode { index, block } => {
                let Some(message) = message_at(self.session.messages(), index) else {
                    self.output.push(format!("! no message {index}"));
                    return;
                };
                let id = CodeSegmentId::new(message.id(), block);
                if self.copy.copy_code(id, &mut self.notifications).await {
                    self.redraw(index);
                }
            }
            Command::Expand { index } => {
                let local = self.session.local_user().id();
                match self.transcript.toggle(
                    self.session.messages(),
                    index,
                    local,
                    &mut self.copy,
                    Instant::now(),
                ) {
                    Some(lines) => self.output.extend(lines),
                    None => self.output.push(format!("! no message {index}")),
                }
                self.follow_output();
            }
            Command::Bottom => {
                self.session.scroll_mut().scroll_to_bottom();
                self.follow_output();
            }
            Command::Topic(topic_id) => self.enter(topic_id),
            Command::Refresh => {
                self.session.refresh_topic();
                self.session.refresh_feed();
            }
            Command::Retry => {
                if !self.session.send() {
                    self.output.push("! nothing to resend".to_string());
                }
            }
            Command::Dismiss => self.notifications.dismiss(),
            Command::Help => self.output.extend(HELP.iter().map(ToString::to_string)),
            Command::Quit => self.running = false,
        }
    }

    /// Prints message `index` again so its copy markers are current.
    fn redraw(&mut self, index: usize) {
        self.redraw_at(index, Instant::now());
    }

    fn redraw_at(&mut self, index: usize, now: Instant) {
        let local = self.session.local_user().id();
        if let Some(lines) =
            self.transcript
                .redraw(self.session.messages(), index, local, &mut self.copy, now)
        {
            self.output.extend(lines);
            self.follow_output();
        }
    }

    fn tick(&mut self, now: Instant) {
        let mut expired: Vec<usize> = self
            .copy
            .tick(now)
            .into_iter()
            .filter_map(|target| {
                self.session
                    .messages()
                    .iter()
                    .position(|m| m.id() == target.message_id())
            })
            .map(|i| i + 1)
            .collect();
        expired.sort_unstable();
        expired.dedup();
        for index in expired {
            self.redraw_at(index, now);
        }

        if self.notifications.tick(now) {
            if let Some(notification) = self.notifications.current() {
                let marker = match notification.level {
                    NotificationLevel::Info => "✓",
                    NotificationLevel::Error => "!",
                };
                self.output.push(format!("{marker} {}", notification.message));
            }
        }
    }

    async fn flush(&mut self, out: &mut Stdout) -> std::io::Result<()> {
        if self.output.is_empty() {
            return Ok(());
        }
        let mut text = self.output.join("\n");
        text.push('\n');
        self.output.clear();
        out.write_all(text.as_bytes()).await?;
        out.flush().await
    }
}

fn message_at(messages: &[Message], index: usize) -> Option<&Message> {
    messages.get(index.checked_sub(1)?)
}

fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::markup::code_block_markup;
    use crate::domain::ApiError;
    use crate::domain::ports::mocks::{MockClipboard, MockEngine, MockRoomData};
    use chrono::Utc;
    use tokio::time::timeout;

    struct Harness {
        app: App,
        port: Arc<MockRoomData>,
        clipboard: Arc<MockClipboard>,
    }

    fn harness(feed: Vec<Message>) -> Harness {
        let local = User::new(1, "ada");
        let port = Arc::new(MockRoomData::new(local.clone()));
        port.push_feed(Ok(feed));
        let clipboard = Arc::new(MockClipboard::new());
        let app = App::new(
            port.clone(),
            Arc::new(MockEngine::default()),
            clipboard.clone(),
            RoomSettings::default(),
            local,
        );
        Harness {
            app,
            port,
            clipboard,
        }
    }

    async fn settle(app: &mut App) {
        while let Ok(Some(event)) = timeout(Duration::from_millis(10), app.session.next_event()).await {
            let update = app.session.handle_event(event);
            app.apply_update(&update);
        }
    }

    fn take(app: &mut App) -> Vec<String> {
        std::mem::take(&mut app.output)
    }

    fn code_message() -> Message {
        let content = format!("<p>try this</p>{}", code_block_markup("if a < b:\n    go()"));
        Message::new(7, content, User::new(2, "grace"), Utc::now())
    }

    #[tokio::test(start_paused = true)]
    async fn test_join_prints_header_and_messages() {
        let Harness { mut app, .. } = harness(vec![code_message()]);
        app.enter(TopicId(1));
        settle(&mut app).await;

        let out = take(&mut app);
        assert_eq!(out[0], "joining topic 1…");
        assert!(out.contains(&"# General".to_string()));
        assert!(out.contains(&"  1 │ try this".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_typed_line_is_sent_as_paragraph() {
        let Harness { mut app, port, .. } = harness(Vec::new());
        app.enter(TopicId(1));
        settle(&mut app).await;

        app.handle_line("hello <there>").await;
        settle(&mut app).await;

        assert_eq!(
            port.sent(),
            vec![(TopicId(1), "<p>hello &lt;there&gt;</p>".to_string())]
        );
        assert_eq!(app.session.draft(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_commands() {
        let Harness {
            mut app, clipboard, ..
        } = harness(vec![code_message()]);
        app.enter(TopicId(1));
        settle(&mut app).await;
        take(&mut app);

        app.handle_line("/copycode 1 1").await;
        assert_eq!(clipboard.last().as_deref(), Some("if a < b:\n    go()"));

        app.handle_line("/copy 1").await;
        let copied = clipboard.last().unwrap();
        assert!(copied.starts_with("try this"));
        assert!(copied.contains("if a < b:\n    go()"));

        app.handle_line("/copy 9").await;
        assert_eq!(take(&mut app).last().unwrap(), "! no message 9");
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_marker_clears_after_feedback_duration() {
        let Harness { mut app, .. } = harness(vec![code_message()]);
        app.enter(TopicId(1));
        settle(&mut app).await;
        take(&mut app);

        app.handle_line("/copycode 1 1").await;
        let copied_at = Instant::now();
        let out = take(&mut app);
        assert!(out.iter().any(|line| line.ends_with("[code 1.1 ✓ copied]")));
        assert!(out.contains(&"  1 │ try this".to_string()));

        app.handle_line("/copy 1").await;
        let out = take(&mut app);
        assert!(out.contains(&"  1 │ try this  ✓ copied".to_string()));

        app.tick(copied_at + Duration::from_millis(1000));
        assert!(take(&mut app).is_empty());

        app.tick(Instant::now() + Duration::from_millis(2001));
        let out = take(&mut app);
        assert!(out.iter().any(|line| line.ends_with("[code 1.1]")));
        assert!(out.contains(&"  1 │ try this".to_string()));
        assert!(!out.iter().any(|line| line.contains("✓ copied")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_failure_then_retry() {
        let Harness { mut app, port, .. } = harness(Vec::new());
        port.fail_sends(Some(ApiError::network("down")));
        app.enter(TopicId(1));
        settle(&mut app).await;
        take(&mut app);

        app.handle_line("hello").await;
        settle(&mut app).await;
        assert_eq!(
            take(&mut app),
            vec!["! Failed to send message. Please try again. (/retry to resend)"]
        );
        assert_eq!(app.session.draft(), "<p>hello</p>");

        port.fail_sends(None);
        app.handle_line("/retry").await;
        settle(&mut app).await;
        assert_eq!(take(&mut app), vec!["✓ back in sync"]);
        assert_eq!(port.sent().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_recovery_does_not_hide_topic_failure() {
        let local = User::new(1, "ada");
        let port = Arc::new(MockRoomData::new(local.clone()));
        port.set_topic(Err(ApiError::not_found("topic 1")));
        port.push_feed(Err(ApiError::network("down")));
        port.push_feed(Ok(Vec::new()));
        let mut app = App::new(
            port,
            Arc::new(MockEngine::default()),
            Arc::new(MockClipboard::new()),
            RoomSettings::default(),
            local,
        );
        app.enter(TopicId(1));
        settle(&mut app).await;

        let out = take(&mut app);
        assert!(out.contains(&"! Failed to load topic details.".to_string()));
        assert!(out.contains(&"! Failed to fetch messages. Please try again later.".to_string()));

        let event = timeout(Duration::from_secs(5), app.session.next_event())
            .await
            .unwrap()
            .unwrap();
        let update = app.session.handle_event(event);
        app.apply_update(&update);

        assert!(update.error_changed);
        assert!(take(&mut app).is_empty());
        assert_eq!(app.shown_errors.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_command_and_quit() {
        let Harness { mut app, .. } = harness(Vec::new());
        app.handle_line("/bogus").await;
        assert_eq!(take(&mut app), vec!["! unknown command: /bogus"]);

        app.handle_line("/quit").await;
        assert!(!app.running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_topic_switch_resets_transcript() {
        let Harness { mut app, port, .. } = harness(vec![code_message()]);
        app.enter(TopicId(1));
        settle(&mut app).await;

        app.handle_line("/topic 2").await;
        settle(&mut app).await;

        assert_eq!(app.session.topic_id(), Some(TopicId(2)));
        let out = take(&mut app);
        assert!(out.contains(&"joining topic 2…".to_string()));
        assert!(!out.iter().any(|line| line == "── reloaded ──"));
        assert_eq!(port.topic_calls(), 2);
    }
}
