use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

use super::events::{RoomEvent, SessionTag};
use crate::domain::RoomDataPort;

const MIN_PERIOD: Duration = Duration::from_millis(100);

/// Recurring feed fetch bound to one room session.
///
/// Ticks never overlap: the next tick waits for the previous fetch.
pub struct PollTask {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl PollTask {
    /// Spawns the loop. The first fetch happens one `period` from now; periods under 100 ms are raised to 100 ms.
    #[must_use]
    pub fn start(
        port: Arc<dyn RoomDataPort>,
        tag: SessionTag,
        period: Duration,
        events: mpsc::UnboundedSender<RoomEvent>,
    ) -> Self {
        let period = period.max(MIN_PERIOD);
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            while flag.load(Ordering::SeqCst) {
                ticker.tick().await;

                if !flag.load(Ordering::SeqCst) {
                    break;
                }

                debug!(topic_id = %tag.topic_id, generation = tag.generation, "Sync tick");
                let result = port.fetch_messages(tag.topic_id).await;
                if events.send(RoomEvent::FeedLoaded { tag, result }).is_err() {
                    debug!("Room event channel closed");
                    break;
                }
            }

            debug!(topic_id = %tag.topic_id, "Poll loop stopped");
        });

        Self {
            running,
            handle,
        }
    }

    /// Whether the loop is still alive and not stopped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst) && !self.handle.is_finished()
    }

    /// Stops the loop. Takes effect immediately, even mid-fetch.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.handle.abort();
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockRoomData;
    use crate::domain::{TopicId, User};
    use tokio::time::timeout;

    fn tag() -> SessionTag {
        SessionTag {
            topic_id: TopicId(7),
            generation: 1,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_on_period() {
        let port = Arc::new(MockRoomData::new(User::new(1, "ada")));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = PollTask::start(port.clone(), tag(), Duration::from_millis(3000), tx);

        assert!(
            timeout(Duration::from_millis(2900), rx.recv())
                .await
                .is_err()
        );

        let event = timeout(Duration::from_millis(200), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.tag(), tag());
        assert!(matches!(event, RoomEvent::FeedLoaded { result: Ok(_), .. }));

        timeout(Duration::from_millis(3100), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(port.feed_calls(), 2);
        assert!(task.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_future_ticks() {
        let port = Arc::new(MockRoomData::new(User::new(1, "ada")));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = PollTask::start(port.clone(), tag(), Duration::from_millis(3000), tx);

        task.stop();
        assert!(matches!(
            timeout(Duration::from_secs(10), rx.recv()).await,
            Ok(None) | Err(_)
        ));
        assert_eq!(port.feed_calls(), 0);
        assert!(!task.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_loop() {
        let port = Arc::new(MockRoomData::new(User::new(1, "ada")));
        let (tx, mut rx) = mpsc::unbounded_channel();
        drop(PollTask::start(port.clone(), tag(), Duration::from_millis(3000), tx));

        assert!(matches!(
            timeout(Duration::from_secs(10), rx.recv()).await,
            Ok(None) | Err(_)
        ));
        assert_eq!(port.feed_calls(), 0);
    }
}
