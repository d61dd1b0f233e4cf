//! Snapshot persistence: the whole store is saved and restored as one unit.

use crate::errors::PersistError;
use crate::models::{Recipe, User};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// Point-in-time copy of the entire store.
///
/// User keys are lowercased usernames, matching the live store's
/// case-insensitive indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub users: HashMap<String, User>,
    pub recipes: HashMap<u64, Recipe>,
    pub next_recipe_id: u64,
}

/// Durable storage for snapshots.
///
/// `persist` must replace the previous snapshot atomically: a failed write
/// leaves the prior durable state intact. `restore` returns `None` when
/// nothing has been persisted yet.
pub trait Storage: Send + Sync {
    fn persist(&self, snapshot: &Snapshot) -> Result<(), PersistError>;
    fn restore(&self) -> Result<Option<Snapshot>, PersistError>;
}

/// Stores the snapshot as a single JSON document on disk.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonFileStorage {
    fn persist(&self, snapshot: &Snapshot) -> Result<(), PersistError> {
        let json = serde_json::to_vec_pretty(snapshot)?;

        // Write to a temp file in the target directory, then rename over
        // the old snapshot. Readers never observe a partial write.
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| PersistError::Io(e.error))?;

        info!(
            "saved snapshot: users={} recipes={}",
            snapshot.users.len(),
            snapshot.recipes.len()
        );
        Ok(())
    }

    fn restore(&self) -> Result<Option<Snapshot>, PersistError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

/// Keeps the last persisted snapshot in memory. Used by tests.
#[derive(Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<Snapshot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn persist(&self, snapshot: &Snapshot) -> Result<(), PersistError> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(snapshot.clone());
        Ok(())
    }

    fn restore(&self) -> Result<Option<Snapshot>, PersistError> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        Ok(slot.clone())
    }
}
