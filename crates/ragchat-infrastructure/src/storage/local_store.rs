//! Durable key/value store backed by a single TOML file.
//!
//! Every write goes through a lock file, a temporary file, fsync, and an
//! atomic rename, so a crash never leaves a half-written store behind.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

/// Errors that can occur during local store operations.
#[derive(Debug)]
pub enum LocalStoreError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parse error.
    ParseError(toml::de::Error),
    /// TOML serialization error.
    SerializeError(toml::ser::Error),
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for LocalStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocalStoreError::IoError(e) => write!(f, "I/O error: {}", e),
            LocalStoreError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            LocalStoreError::SerializeError(e) => write!(f, "TOML serialization error: {}", e),
            LocalStoreError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for LocalStoreError {}

impl From<std::io::Error> for LocalStoreError {
    fn from(e: std::io::Error) -> Self {
        LocalStoreError::IoError(e)
    }
}

impl From<toml::de::Error> for LocalStoreError {
    fn from(e: toml::de::Error) -> Self {
        LocalStoreError::ParseError(e)
    }
}

impl From<toml::ser::Error> for LocalStoreError {
    fn from(e: toml::ser::Error) -> Self {
        LocalStoreError::SerializeError(e)
    }
}

impl From<LocalStoreError> for ragchat_core::ChatError {
    fn from(e: LocalStoreError) -> Self {
        ragchat_core::ChatError::storage(e.to_string())
    }
}

type Entries = BTreeMap<String, String>;

/// String key/value pairs that survive process restarts.
///
/// Responsibilities:
/// - Read a single key without locking
/// - Read-modify-write under an exclusive file lock
/// - Restrict file permissions to the owner on Unix
///
/// Does NOT:
/// - Know what the keys mean (the credential key is chosen by the caller)
/// - Encrypt values
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        Ok(self.load()?.remove(key))
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    /// Removes `key`. Removing a missing key (or from a missing file) succeeds.
    pub fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn load(&self) -> Result<Entries, LocalStoreError> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        Ok(toml::from_str(&content)?)
    }

    fn update<F>(&self, f: F) -> Result<(), LocalStoreError>
    where
        F: FnOnce(&mut Entries),
    {
        let _lock = FileLock::acquire(&self.path)?;
        let mut entries = self.load()?;
        f(&mut entries);
        self.save(&entries)
    }

    fn save(&self, entries: &Entries) -> Result<(), LocalStoreError> {
        let parent = self.path.parent().ok_or_else(|| {
            LocalStoreError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            ))
        })?;
        fs::create_dir_all(parent)?;

        let file_name = self.path.file_name().ok_or_else(|| {
            LocalStoreError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;
        let tmp_path = parent.join(format!(".{}.tmp", file_name.to_string_lossy()));

        // A leftover from an interrupted write may carry wider permissions.
        match fs::remove_file(&tmp_path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut tmp_file = options.open(&tmp_path)?;
        tmp_file.write_all(toml::to_string_pretty(entries)?.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// Exclusive lock on `<path>.lock`, released when the handle closes.
///
/// The lock file is never unlinked: waiters may still hold its inode.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, LocalStoreError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| LocalStoreError::LockError(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file })
    }
}
