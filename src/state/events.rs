use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::state::store::StoreEvent;

/// Broadcast hub fanning store changes out to whoever is listening.
pub struct EventHub {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, event: StoreEvent) {
        let _ = self.sender.send(event);
    }
}

/// Trace every event received on `events` until the hub goes away.
///
/// Returns how many events were logged.
pub async fn log_events(mut events: broadcast::Receiver<StoreEvent>) -> usize {
    let mut logged = 0;
    loop {
        match events.recv().await {
            Ok(event) => {
                debug!(?event, "ledger changed");
                logged += 1;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "event logger fell behind");
            }
            Err(RecvError::Closed) => return logged,
        }
    }
}
