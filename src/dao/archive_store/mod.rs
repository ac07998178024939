#[cfg(feature = "file-store")]
pub mod file;
pub mod memory;

#[cfg(feature = "file-store")]
pub use file::FileArchiveStore;
pub use memory::MemoryArchiveStore;

use crate::dao::models::GameSessionEntity;
use crate::dao::storage::{StorageError, StorageResult};
use crate::state::game::GameSession;

/// Logical key under which the archive of past sessions is stored.
pub const DEFAULT_ARCHIVE_KEY: &str = "pastSessions";

/// Abstraction over a key/value byte store holding the serialized archive.
///
/// Both operations are synchronous: the ledger loads once at construction and
/// writes the whole archive back after each resolved game.
pub trait ArchiveStore: Send + Sync {
    /// Fetch the bytes stored under `key`, or `None` when nothing was written yet.
    fn load(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;
    /// Replace whatever is stored under `key` with `bytes`.
    fn save(&self, key: &str, bytes: &[u8]) -> StorageResult<()>;
}

/// Serialize the full archive, most recent session first.
pub fn encode_archive(sessions: &[GameSession]) -> StorageResult<Vec<u8>> {
    let entities: Vec<GameSessionEntity> = sessions.iter().cloned().map(Into::into).collect();
    serde_json::to_vec(&entities).map_err(|source| StorageError::Encode { source })
}

/// Parse an archive previously produced by [`encode_archive`].
pub fn decode_archive(bytes: &[u8]) -> StorageResult<Vec<GameSession>> {
    let entities: Vec<GameSessionEntity> =
        serde_json::from_slice(bytes).map_err(|source| StorageError::Decode { source })?;
    Ok(entities.into_iter().map(Into::into).collect())
}
