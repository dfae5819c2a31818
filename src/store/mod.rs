pub mod action;
pub mod bus;
pub mod reducer;
pub mod state;

pub use action::{Action, EntityKind, OpKind};
pub use bus::{EventBus, StoreEvent};
pub use reducer::reduce;
pub use state::{AppState, ProjectsState, RequestState, TasksState};

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;

/// Result of a dispatch
#[derive(Debug, Clone)]
pub struct Dispatched {
    /// State after the action
    pub state: Arc<AppState>,
    /// Whether the action changed anything
    pub changed: bool,
}

/// The single writer over [`AppState`].
///
/// The state sits behind an `Arc` that is copied on write, so snapshots
/// handed out earlier are never mutated underneath their holders.
pub struct Store {
    state: Mutex<Arc<AppState>>,
    bus: EventBus,
}

impl Store {
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(state: AppState) -> Self {
        Store {
            state: Mutex::new(Arc::new(state)),
            bus: EventBus::default(),
        }
    }

    /// Current state; cheap to call.
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.state.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Apply an action atomically and notify subscribers if it changed the state.
    pub fn dispatch(&self, action: Action) -> Dispatched {
        let label = action.label();
        let (state, changed) = {
            let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let mut next = Arc::clone(&guard);
            let changed = reduce(Arc::make_mut(&mut next), action);
            if changed {
                *guard = Arc::clone(&next);
            }
            (Arc::clone(&guard), changed)
        };

        if changed {
            tracing::debug!(action = %label, "state changed");
            self.bus.publish(StoreEvent {
                label,
                state: Arc::clone(&state),
            });
        } else {
            tracing::trace!(action = %label, "no change");
        }
        Dispatched { state, changed }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.bus.subscribe()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
