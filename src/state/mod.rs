pub mod events;
pub mod game;
pub mod store;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{config::AppConfig, dao::archive_store::ArchiveStore};

pub use self::events::{EventHub, log_events};
pub use self::store::{GameStore, StoreEvent, StoreOptions};

pub type SharedState = Arc<AppState>;

/// Central application state: the ledger behind one lock plus its event hub.
///
/// Services take the write lock once per operation, which makes every
/// read-modify-write on the ledger atomic with respect to other callers.
pub struct AppState {
    store: RwLock<GameStore>,
    events: EventHub,
    config: AppConfig,
}

impl AppState {
    /// Build the ledger over `archive` and wrap everything in an [`Arc`].
    pub fn new(config: AppConfig, archive: Arc<dyn ArchiveStore>) -> SharedState {
        let store = GameStore::new(archive, config.store_options());
        Arc::new(Self {
            store: RwLock::new(store),
            events: EventHub::new(config.event_capacity),
            config,
        })
    }

    /// The ledger itself.
    pub fn store(&self) -> &RwLock<GameStore> {
        &self.store
    }

    /// Hub publishing every successful ledger mutation.
    pub fn events(&self) -> &EventHub {
        &self.events
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
