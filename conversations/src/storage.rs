//! Durable key-value capability behind the conversation store.
//!
//! The store reads the whole payload once at startup and writes the whole
//! payload after each mutation. There is a single writer, so no locking
//! beyond "read full state, write full state" is needed.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Errors from a [`StateStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Load/save of one serialized state record.
pub trait StateStore {
    /// Read the stored payload. `Ok(None)` means nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored payload.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the write.
    fn save(&self, payload: &str) -> Result<(), StorageError>;
}

// =============================================================================
// FILE STORE
// =============================================================================

/// Stores the payload as a single file. Writes go to a sibling temp file
/// and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io { path: self.path.clone(), source }
    }
}

impl StateStore for FileStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, payload: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, payload).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-process store. Used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    payload: Mutex<Option<String>>,
    fail_saves: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing payload, as if saved by an earlier session.
    #[must_use]
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self { payload: Mutex::new(Some(payload.into())), fail_saves: false }
    }

    /// A store whose writes always fail, e.g. to simulate an exhausted quota.
    #[must_use]
    pub fn failing() -> Self {
        Self { payload: Mutex::new(None), fail_saves: true }
    }

    /// The last saved payload, if any.
    #[must_use]
    pub fn payload(&self) -> Option<String> {
        self.payload
            .lock()
            .map_or(None, |guard| guard.clone())
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        self.payload
            .lock()
            .map(|guard| guard.clone())
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }

    fn save(&self, payload: &str) -> Result<(), StorageError> {
        if self.fail_saves {
            return Err(StorageError::Unavailable("quota exceeded".into()));
        }
        let mut guard = self
            .payload
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = Some(payload.to_owned());
        Ok(())
    }
}

impl<T: StateStore + ?Sized> StateStore for &T {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, payload: &str) -> Result<(), StorageError> {
        (**self).save(payload)
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
