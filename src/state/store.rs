//! Owner of the current game and of the archive of resolved games.

use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::dao::archive_store::{ArchiveStore, DEFAULT_ARCHIVE_KEY, decode_archive, encode_archive};
use crate::state::game::{GameSession, Player};

/// Lowest score a player can be set to unless configured otherwise.
pub const DEFAULT_MINIMUM_SCORE: i32 = 0;

/// Tunables for a [`GameStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Key the archive is stored under in the [`ArchiveStore`].
    pub archive_key: String,
    /// Floor applied to every explicit score update.
    pub minimum_score: i32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            archive_key: DEFAULT_ARCHIVE_KEY.into(),
            minimum_score: DEFAULT_MINIMUM_SCORE,
        }
    }
}

/// Change produced by a successful store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A fresh session now occupies the current slot.
    GameStarted {
        /// Identifier of the new session.
        session_id: Uuid,
        /// Session that was discarded to make room, if any.
        replaced: Option<Uuid>,
    },
    /// A player joined the current session.
    PlayerAdded {
        /// Session the player joined.
        session_id: Uuid,
        /// The new player, score included.
        player: Player,
    },
    /// A player's score was replaced.
    ScoreUpdated {
        /// Session holding the player.
        session_id: Uuid,
        /// Player whose score changed.
        player_id: Uuid,
        /// Score after the floor was applied.
        score: i32,
    },
    /// The current session was resolved and archived.
    GameResolved {
        /// Identifier of the archived session.
        session_id: Uuid,
        /// Name recorded as winner.
        winner_name: String,
        /// Whether the archive write reached the backend.
        persisted: bool,
    },
    /// The current session was thrown away without archiving.
    GameCancelled {
        /// Identifier of the discarded session.
        session_id: Uuid,
    },
}

/// Single owner of the in-progress game and the archive of past games.
///
/// Every mutator returns `None` when it had nothing to act on (no current
/// game, unknown player, nobody seated) and `Some` event describing the
/// change otherwise. Nothing here ever fails loudly: persistence problems are
/// logged and the in-memory state stays authoritative.
pub struct GameStore {
    archive: Arc<dyn ArchiveStore>,
    options: StoreOptions,
    current: Option<GameSession>,
    past: Vec<GameSession>,
}

impl GameStore {
    /// Build a store and load the archive from `archive`.
    ///
    /// Missing, unreadable or undecodable archives all start the store with an
    /// empty history.
    pub fn new(archive: Arc<dyn ArchiveStore>, options: StoreOptions) -> Self {
        let past = load_past_sessions(archive.as_ref(), &options.archive_key);
        Self {
            archive,
            options,
            current: None,
            past,
        }
    }

    /// Game currently in progress.
    pub fn current_session(&self) -> Option<&GameSession> {
        self.current.as_ref()
    }

    /// Resolved games, most recent first.
    pub fn past_sessions(&self) -> &[GameSession] {
        &self.past
    }

    /// Floor applied by [`GameStore::update_score`].
    pub fn minimum_score(&self) -> i32 {
        self.options.minimum_score
    }

    /// Open a new session, optionally backdated to `played_at`.
    ///
    /// Timestamps in the future are replaced by the current time and those
    /// before the Unix epoch by the epoch itself, the earliest date the
    /// archive can encode. A session already in progress is discarded without
    /// being archived.
    pub fn start_new_game(&mut self, played_at: Option<SystemTime>) -> Option<StoreEvent> {
        let now = SystemTime::now();
        let date = match played_at {
            Some(at) if at > now => {
                debug!("requested game date lies in the future; using now");
                now
            }
            Some(at) if at < UNIX_EPOCH => {
                debug!("requested game date predates the Unix epoch; using the epoch");
                UNIX_EPOCH
            }
            Some(at) => at,
            None => now,
        };

        let session = GameSession::new(date);
        let session_id = session.id;
        let replaced = self.current.replace(session).map(|old| old.id);
        if let Some(old) = replaced {
            warn!(session_id = %old, "discarding unfinished game");
        }

        info!(session_id = %session_id, "game started");
        Some(StoreEvent::GameStarted {
            session_id,
            replaced,
        })
    }

    /// Seat a new player with a zero score.
    pub fn add_player(&mut self, name: impl Into<String>) -> Option<StoreEvent> {
        let session = self.current.as_mut()?;
        let player = Player::new(name);
        session.players.push(player.clone());

        debug!(session_id = %session.id, player_id = %player.id, "player added");
        Some(StoreEvent::PlayerAdded {
            session_id: session.id,
            player,
        })
    }

    /// Replace a player's score, raising it to the configured floor if needed.
    pub fn update_score(&mut self, player_id: Uuid, new_score: i32) -> Option<StoreEvent> {
        let floor = self.options.minimum_score;
        let session = self.current.as_mut()?;
        let session_id = session.id;
        let player = session.player_mut(player_id)?;
        player.score = new_score.max(floor);

        debug!(
            session_id = %session_id,
            player_id = %player_id,
            score = player.score,
            "score updated"
        );
        Some(StoreEvent::ScoreUpdated {
            session_id,
            player_id,
            score: player.score,
        })
    }

    /// Resolve the current game, archive it and persist the archive.
    ///
    /// Does nothing while no player is seated; the session stays active.
    pub fn call_winner(&mut self) -> Option<StoreEvent> {
        let winner_name = self.current.as_ref()?.winner()?.name.clone();
        let mut session = self.current.take()?;
        session.winner_name = Some(winner_name.clone());
        session.is_active = false;

        let session_id = session.id;
        self.past.insert(0, session);
        let persisted = self.persist();

        info!(session_id = %session_id, winner = %winner_name, persisted, "game resolved");
        Some(StoreEvent::GameResolved {
            session_id,
            winner_name,
            persisted,
        })
    }

    /// Throw away the current game. The archive is left untouched.
    pub fn cancel_game(&mut self) -> Option<StoreEvent> {
        let session = self.current.take()?;
        info!(session_id = %session.id, players = session.players.len(), "game cancelled");
        Some(StoreEvent::GameCancelled {
            session_id: session.id,
        })
    }

    fn persist(&self) -> bool {
        let key = &self.options.archive_key;
        let result = encode_archive(&self.past).and_then(|bytes| self.archive.save(key, &bytes));
        match result {
            Ok(()) => true,
            Err(err) => {
                error!(key = %key, error = %err, "failed to persist archive");
                false
            }
        }
    }
}

fn load_past_sessions(archive: &dyn ArchiveStore, key: &str) -> Vec<GameSession> {
    let bytes = match archive.load(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            info!(key = %key, "no archive found; starting with empty history");
            return Vec::new();
        }
        Err(err) => {
            warn!(key = %key, error = %err, "failed to read archive; starting with empty history");
            return Vec::new();
        }
    };

    match decode_archive(&bytes) {
        Ok(sessions) => {
            info!(key = %key, count = sessions.len(), "loaded archive");
            sessions
        }
        Err(err) => {
            warn!(key = %key, error = %err, "failed to decode archive; starting with empty history");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::dao::archive_store::MemoryArchiveStore;
    use crate::dao::storage::{StorageError, StorageResult};

    struct FailingArchive;

    impl ArchiveStore for FailingArchive {
        fn load(&self, _key: &str) -> StorageResult<Option<Vec<u8>>> {
            Err(StorageError::unavailable(
                "disk gone".into(),
                std::io::Error::other("disk gone"),
            ))
        }

        fn save(&self, _key: &str, _bytes: &[u8]) -> StorageResult<()> {
            Err(StorageError::unavailable(
                "disk gone".into(),
                std::io::Error::other("disk gone"),
            ))
        }
    }

    fn store_over(backing: &MemoryArchiveStore) -> GameStore {
        GameStore::new(Arc::new(backing.clone()), StoreOptions::default())
    }

    fn active_store() -> (MemoryArchiveStore, GameStore) {
        let backing = MemoryArchiveStore::new();
        let mut store = store_over(&backing);
        store.start_new_game(None);
        (backing, store)
    }

    fn player_ids(store: &GameStore) -> Vec<Uuid> {
        store
            .current_session()
            .unwrap()
            .players
            .iter()
            .map(|p| p.id)
            .collect()
    }

    #[test]
    fn starts_empty_without_archive() {
        let store = store_over(&MemoryArchiveStore::new());
        assert!(store.current_session().is_none());
        assert!(store.past_sessions().is_empty());
    }

    #[test]
    fn added_players_start_at_zero_with_distinct_ids() {
        let (_, mut store) = active_store();
        for name in ["A", "B", "C", "D", "E"] {
            assert!(store.add_player(name).is_some());
        }

        let session = store.current_session().unwrap();
        assert_eq!(session.players.len(), 5);
        assert!(session.players.iter().all(|p| p.score == 0));

        let mut ids = player_ids(&store);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn mutators_without_a_game_are_silent_noops() {
        let backing = MemoryArchiveStore::new();
        let mut store = store_over(&backing);

        assert!(store.add_player("A").is_none());
        assert!(store.update_score(Uuid::new_v4(), 3).is_none());
        assert!(store.call_winner().is_none());
        assert!(store.cancel_game().is_none());
        assert!(store.current_session().is_none());
        assert!(backing.is_empty());
    }

    #[test]
    fn update_score_is_idempotent() {
        let (_, mut store) = active_store();
        store.add_player("A");
        let id = player_ids(&store)[0];

        store.update_score(id, 17);
        store.update_score(id, 17);

        assert_eq!(store.current_session().unwrap().players[0].score, 17);
    }

    #[test]
    fn scores_below_the_floor_are_clamped() {
        let (_, mut store) = active_store();
        store.add_player("A");
        let id = player_ids(&store)[0];

        for low in [-1, -50, i32::MIN] {
            let event = store.update_score(id, low);
            assert_eq!(
                event,
                Some(StoreEvent::ScoreUpdated {
                    session_id: store.current_session().unwrap().id,
                    player_id: id,
                    score: 0,
                })
            );
        }
    }

    #[test]
    fn custom_floor_is_respected() {
        let options = StoreOptions {
            minimum_score: -10,
            ..StoreOptions::default()
        };
        let mut store = GameStore::new(Arc::new(MemoryArchiveStore::new()), options);
        store.start_new_game(None);
        store.add_player("A");
        let id = player_ids(&store)[0];

        store.update_score(id, -4);
        assert_eq!(store.current_session().unwrap().players[0].score, -4);
        store.update_score(id, -40);
        assert_eq!(store.current_session().unwrap().players[0].score, -10);
    }

    #[test]
    fn unknown_player_update_is_a_noop() {
        let (_, mut store) = active_store();
        store.add_player("A");

        assert!(store.update_score(Uuid::new_v4(), 9).is_none());
        assert_eq!(store.current_session().unwrap().players[0].score, 0);
    }

    #[test]
    fn calling_winner_archives_lowest_score_at_the_front() {
        let (backing, mut store) = active_store();
        store.add_player("Earlier");
        store.call_winner();

        store.start_new_game(None);
        for name in ["A", "B", "C"] {
            store.add_player(name);
        }
        let ids = player_ids(&store);
        for (id, score) in ids.iter().zip([3, 1, 5]) {
            store.update_score(*id, score);
        }
        let session_id = store.current_session().unwrap().id;

        let event = store.call_winner();

        assert_eq!(
            event,
            Some(StoreEvent::GameResolved {
                session_id,
                winner_name: "B".into(),
                persisted: true,
            })
        );
        assert!(store.current_session().is_none());
        let past = store.past_sessions();
        assert_eq!(past.len(), 2);
        assert_eq!(past[0].id, session_id);
        assert_eq!(past[0].winner_name.as_deref(), Some("B"));
        assert!(!past[0].is_active);
        assert_eq!(past[1].winner_name.as_deref(), Some("Earlier"));
        assert_eq!(backing.len(), 1);
    }

    #[test]
    fn calling_winner_with_nobody_seated_changes_nothing() {
        let (backing, mut store) = active_store();
        let session_id = store.current_session().unwrap().id;

        assert!(store.call_winner().is_none());

        let current = store.current_session().unwrap();
        assert_eq!(current.id, session_id);
        assert!(current.is_active);
        assert!(store.past_sessions().is_empty());
        assert!(backing.is_empty());
    }

    #[test]
    fn cancel_discards_without_archiving() {
        let (backing, mut store) = active_store();
        store.add_player("A");
        store.add_player("B");
        let session_id = store.current_session().unwrap().id;

        assert_eq!(
            store.cancel_game(),
            Some(StoreEvent::GameCancelled { session_id })
        );
        assert!(store.current_session().is_none());
        assert!(store.past_sessions().is_empty());
        assert!(backing.is_empty());
    }

    #[test]
    fn archive_survives_restart() {
        let backing = MemoryArchiveStore::new();
        let mut store = store_over(&backing);

        let games: [&[(&str, i32)]; 2] = [
            &[("Zoë", 0), ("Björn", 12)],
            &[("李雷", 1_000_000), ("Ana", 2_000_000), ("Ωmega", 999_999)],
        ];
        for game in games {
            store.start_new_game(Some(SystemTime::UNIX_EPOCH + Duration::from_secs(86_400)));
            for (name, _) in game {
                store.add_player(*name);
            }
            for (id, (_, score)) in player_ids(&store).into_iter().zip(game.iter()) {
                store.update_score(id, *score);
            }
            store.call_winner();
        }
        let before = store.past_sessions().to_vec();
        drop(store);

        let restarted = store_over(&backing);
        assert_eq!(restarted.past_sessions(), before.as_slice());
        assert_eq!(restarted.past_sessions()[0].winner_name.as_deref(), Some("Ωmega"));
        assert!(restarted.current_session().is_none());
    }

    #[test]
    fn consecutive_starts_get_fresh_sessions() {
        let mut store = store_over(&MemoryArchiveStore::new());

        store.start_new_game(None);
        let first = store.current_session().unwrap().id;
        store.cancel_game();
        store.start_new_game(None);
        let second = store.current_session().unwrap();

        assert_ne!(first, second.id);
        assert!(second.players.is_empty());
        assert!(second.is_active);
    }

    #[test]
    fn starting_over_an_active_game_replaces_it() {
        let (_, mut store) = active_store();
        store.add_player("A");
        let first = store.current_session().unwrap().id;

        let event = store.start_new_game(None);

        let second = store.current_session().unwrap();
        assert_eq!(
            event,
            Some(StoreEvent::GameStarted {
                session_id: second.id,
                replaced: Some(first),
            })
        );
        assert!(second.players.is_empty());
        assert!(store.past_sessions().is_empty());
    }

    #[test]
    fn backdated_games_keep_their_date_and_future_dates_are_clamped() {
        let mut store = store_over(&MemoryArchiveStore::new());
        let past = SystemTime::now() - Duration::from_secs(3_600);
        store.start_new_game(Some(past));
        assert_eq!(store.current_session().unwrap().date, past);

        let before = SystemTime::now();
        store.start_new_game(Some(before + Duration::from_secs(86_400)));
        let date = store.current_session().unwrap().date;
        assert!(date >= before);
        assert!(date <= SystemTime::now());
    }

    #[test]
    fn pre_epoch_backdate_is_clamped_and_archive_keeps_persisting() {
        let backing = MemoryArchiveStore::new();
        let mut store = store_over(&backing);

        store.start_new_game(Some(UNIX_EPOCH - Duration::from_secs(86_400)));
        assert_eq!(store.current_session().unwrap().date, UNIX_EPOCH);
        store.add_player("A");
        assert!(matches!(
            store.call_winner(),
            Some(StoreEvent::GameResolved { persisted: true, .. })
        ));

        store.start_new_game(None);
        store.add_player("B");
        assert!(matches!(
            store.call_winner(),
            Some(StoreEvent::GameResolved { persisted: true, .. })
        ));
        let before = store.past_sessions().to_vec();
        drop(store);

        let restarted = store_over(&backing);
        assert_eq!(restarted.past_sessions(), before.as_slice());
        assert_eq!(restarted.past_sessions()[1].date, UNIX_EPOCH);
    }

    #[test]
    fn corrupt_archive_starts_with_empty_history() {
        let backing = MemoryArchiveStore::new();
        backing.insert_raw(DEFAULT_ARCHIVE_KEY, b"definitely not json".to_vec());

        let store = store_over(&backing);
        assert!(store.past_sessions().is_empty());
    }

    #[test]
    fn failing_backend_keeps_memory_state_and_reports_it() {
        let mut store = GameStore::new(Arc::new(FailingArchive), StoreOptions::default());
        assert!(store.past_sessions().is_empty());

        store.start_new_game(None);
        store.add_player("A");
        let event = store.call_winner();

        assert!(matches!(
            event,
            Some(StoreEvent::GameResolved { persisted: false, .. })
        ));
        assert_eq!(store.past_sessions().len(), 1);
        assert!(store.current_session().is_none());
    }
}
