use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use crate::dao::storage::StorageResult;

use super::ArchiveStore;

/// In-process archive backend.
///
/// Clones share the same backing map, so dropping a ledger and building a new
/// one over a clone behaves like a restart against the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchiveStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryArchiveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seed `key` with raw bytes, bypassing the archive codec.
    pub fn insert_raw(&self, key: impl Into<String>, bytes: Vec<u8>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), bytes);
    }
}

impl ArchiveStore for MemoryArchiveStore {
    fn load(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, bytes: &[u8]) -> StorageResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), bytes.to_vec());
        Ok(())
    }
}
