//! JSON snapshot persistence and the data-directory lock.
//!
//! Every collection is stored whole, one JSON file per key, rewritten on
//! every mutation. There is no diffing or batching; at the data volumes a
//! single freelancer produces, rewriting the file is cheaper than being
//! clever. Failure policy follows the store contract: reads that fail
//! produce an empty default, writes that fail are logged, and the
//! in-memory state stays authoritative for the rest of the session.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::error;

use crate::error::ErrorCode;

const LOCK_FILE_NAME: &str = "store.lock";

/// Handle to the data directory holding one JSON snapshot file per key.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }

    /// Load the value stored under `key`, or its default when the file is
    /// missing or unreadable. Read failures are logged, never returned.
    #[must_use]
    pub fn load<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(err) => {
                error!(
                    key,
                    code = %ErrorCode::StorageReadFailed,
                    "snapshot load failed, starting empty: {err:#}"
                );
                T::default()
            }
        }
    }

    /// Load the value stored under `key`, or `None` when no snapshot exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(value))
    }

    /// Serialize `value` under `key`. Write failures are logged; the
    /// caller's in-memory value stays authoritative and the next
    /// successful write catches up.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(err) = self.try_save(key, value) {
            error!(
                key,
                code = %ErrorCode::StorageWriteFailed,
                "snapshot save failed, in-memory state kept: {err:#}"
            );
        }
    }

    /// Serialize `value` to JSON and write it under `key`, via a temp file
    /// and rename so readers never observe a half-written snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when the data directory cannot be created or the
    /// file cannot be written.
    pub fn try_save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Failed to create {}", self.data_dir.display()))?;

        let path = self.path_for(key);
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize snapshot '{key}'"))?;

        let tmp = self.data_dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to move snapshot into {}", path.display()))?;
        Ok(())
    }
}

/// Advisory lock errors for the data directory.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("lock timed out after {waited:?} at {}", .path.display())]
    Timeout { path: PathBuf, waited: Duration },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl LockError {
    /// Machine-readable code associated with this lock error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Timeout { .. } => ErrorCode::LockContention,
            Self::Io(_) => ErrorCode::StorageWriteFailed,
        }
    }

    /// Optional remediation hint for users.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

/// RAII guard for the exclusive data-directory lock.
///
/// Held for the whole process lifetime so a second `lc` process cannot
/// interleave snapshot writes with ours. Released on drop.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Acquire the exclusive advisory lock for `data_dir`, retrying until
    /// `timeout` elapses.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Timeout`] when another process holds the lock
    /// for the whole timeout window, or [`LockError::Io`] on filesystem
    /// failures.
    pub fn acquire(data_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(LOCK_FILE_NAME);

        let start = Instant::now();
        loop {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(&path)?;

            if file.try_lock_exclusive().is_ok() {
                return Ok(Self { file, path });
            }

            if start.elapsed() >= timeout {
                return Err(LockError::Timeout {
                    path,
                    waited: start.elapsed(),
                });
            }

            thread::sleep(Duration::from_millis(10));
        }
    }

    /// Explicitly release the lock. Release also happens automatically on drop.
    pub fn release(self) {
        let _ = self.file.unlock();
    }

    /// Return the lock file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
