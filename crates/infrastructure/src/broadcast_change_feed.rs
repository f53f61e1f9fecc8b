use async_trait::async_trait;
use tabula_application::ports::{ChangeEvent, ChangeFeed};
use tabula_core::AppResult;
use tokio::sync::broadcast;

/// Default number of events buffered per subscriber.
pub const DEFAULT_CHANGE_FEED_CAPACITY: usize = 256;

/// In-process change feed fanning events out to every subscriber.
///
/// Slow subscribers lose the oldest events and observe a lag error.
#[derive(Clone)]
pub struct BroadcastChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl BroadcastChangeFeed {
    /// Creates a feed buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CHANGE_FEED_CAPACITY)
    }
}

#[async_trait]
impl ChangeFeed for BroadcastChangeFeed {
    async fn publish(&self, event: ChangeEvent) -> AppResult<()> {
        // No subscribers is not an error; nobody is listening yet.
        if let Ok(receivers) = self.sender.send(event) {
            tracing::trace!(receivers, "published change event");
        }
        Ok(())
    }
}
