//! Persisted session snapshots and the stores that hold them.
//!
//! A snapshot is the JSON encoding of [`SessionState`] kept under a single
//! fixed key. Anything that fails to decode or violates the session
//! invariants is treated as if no snapshot existed.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::StoreError;
use crate::session::SessionState;

/// Key under which the in-progress session is stored
pub const STORAGE_KEY: &str = "spellingGameState";

/// Simple key/value blob storage
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn clear(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes land in a temporary file in the same directory that is then
/// renamed over the target, so a reader sees either the old blob or the
/// new one and never a partial write.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    entries: HashMap<String, String>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Decode a stored blob, rejecting anything structurally invalid
pub fn decode_snapshot(data: &str) -> Option<SessionState> {
    let state: SessionState = match serde_json::from_str(data) {
        Ok(state) => state,
        Err(e) => {
            log::warn!("discarding unreadable session snapshot: {e}");
            return None;
        }
    };

    if !state.check_invariants() {
        log::warn!(
            "discarding inconsistent session snapshot (index {} of {} words)",
            state.current_word_index,
            state.session_words.len()
        );
        return None;
    }

    Some(state)
}

/// Load the resumable session, if any. Store errors count as "no session".
pub fn load_snapshot<S: StateStore + ?Sized>(store: &S) -> Option<SessionState> {
    match store.get(STORAGE_KEY) {
        Ok(Some(data)) => decode_snapshot(&data),
        Ok(None) => None,
        Err(e) => {
            log::warn!("could not read session snapshot: {e}");
            None
        }
    }
}

pub fn save_snapshot<S: StateStore + ?Sized>(
    store: &mut S,
    state: &SessionState,
) -> Result<(), StoreError> {
    let data = serde_json::to_string(state)?;
    store.set(STORAGE_KEY, &data)
}

pub fn clear_snapshot<S: StateStore + ?Sized>(store: &mut S) -> Result<(), StoreError> {
    store.clear(STORAGE_KEY)
}
