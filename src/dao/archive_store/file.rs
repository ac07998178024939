//! Archive backend writing one JSON file per logical key.

use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::dao::storage::{StorageError, StorageResult};

use super::ArchiveStore;

const FILE_EXTENSION: &str = "json";

/// Stores each key as `<dir>/<key>.json`, replacing it atomically on save.
#[derive(Debug, Clone)]
pub struct FileArchiveStore {
    dir: PathBuf,
}

impl FileArchiveStore {
    /// Build a store rooted at `dir`. The directory is created on the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the archive files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey { key: key.into() });
        }
        Ok(self.dir.join(format!("{key}.{FILE_EXTENSION}")))
    }
}

impl ArchiveStore for FileArchiveStore {
    fn load(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no archive file yet");
                Ok(None)
            }
            Err(err) => Err(StorageError::unavailable(
                format!("failed to read `{}`", path.display()),
                err,
            )),
        }
    }

    fn save(&self, key: &str, bytes: &[u8]) -> StorageResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|err| {
            StorageError::unavailable(
                format!("failed to create `{}`", self.dir.display()),
                err,
            )
        })?;

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|err| {
            StorageError::unavailable(
                format!("failed to create temp file in `{}`", self.dir.display()),
                err,
            )
        })?;
        tmp.write_all(bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|err| {
                StorageError::unavailable(format!("failed to write `{}`", tmp.path().display()), err)
            })?;

        // A failed persist hands the temp file back inside the error; dropping it removes it.
        tmp.persist(&path).map_err(|err| {
            StorageError::unavailable(format!("failed to replace `{}`", path.display()), err.error)
        })?;

        debug!(path = %path.display(), size = bytes.len(), "archive written");
        Ok(())
    }
}
