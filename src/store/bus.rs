//! Change notification for the store, backed by a `tokio::sync::broadcast`
//! channel.
//!
//! Every dispatch that changes the state publishes one [`StoreEvent`]
//! carrying the action label and the new state snapshot. Subscribers that
//! fall behind by more than the channel capacity observe
//! `RecvError::Lagged` and should re-read [`Store::snapshot`](super::Store::snapshot).

use std::sync::Arc;

use tokio::sync::broadcast;

use super::state::AppState;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// One applied state change
#[derive(Debug, Clone)]
pub struct StoreEvent {
    /// Action label, e.g. `projects/addProject/fulfilled`
    pub label: String,
    /// State right after the action was applied
    pub state: Arc<AppState>,
}

/// Fan-out bus for [`StoreEvent`]s
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers; dropped silently when there are none.
    pub fn publish(&self, event: StoreEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
