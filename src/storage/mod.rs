//! Local snapshot storage - the crate's analog of browser local storage.
//!
//! Collections live under fixed string keys, one JSON file per key inside a
//! data directory. The in-memory collection is always the source of truth;
//! every mutation re-serializes the whole collection and overwrites its file
//! in one step (write to a temp file, then rename), so a snapshot on disk is
//! either the previous state or the new one, never a torn write. There is no
//! schema version field and no cross-process coordination: two processes
//! sharing a data directory race, and the last writer wins.

use crate::errors::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Fixed storage key for the applications collection.
pub const APPLICATIONS_KEY: &str = "ticketing-applications";
/// Fixed storage key for the notifications collection.
pub const NOTIFICATIONS_KEY: &str = "ticketing-notifications";

/// Whole-collection JSON snapshot store rooted at a data directory.
#[derive(Clone, Debug)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Opens a snapshot store rooted at `root`, creating the directory if it
    /// does not exist yet.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn snapshot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Loads the collection stored under `key`.
    ///
    /// A missing file yields the empty collection; an unreadable or
    /// unparseable file is logged at warn level and also yields the empty
    /// collection. Corruption is never surfaced to the caller and there is
    /// no partial recovery: the stale snapshot is simply replaced on the
    /// next save.
    #[must_use]
    pub fn load<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let path = self.snapshot_path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
            Err(e) => {
                warn!("Failed to read stored collection '{}', starting empty: {}", key, e);
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(collection) => collection,
            Err(e) => {
                warn!("Failed to parse stored collection '{}', starting empty: {}", key, e);
                T::default()
            }
        }
    }

    /// Serializes the whole collection and overwrites the snapshot under
    /// `key`. The write goes to `<key>.json.tmp` first and is renamed into
    /// place, so a crash mid-write leaves the previous snapshot intact.
    pub fn save<T: Serialize>(&self, key: &str, collection: &T) -> Result<()> {
        let json = serde_json::to_string(collection).map_err(|e| Error::Storage {
            message: format!("failed to serialize collection '{key}': {e}"),
        })?;

        let tmp = self.root.join(format!("{key}.json.tmp"));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, self.snapshot_path(key))?;
        Ok(())
    }
}
