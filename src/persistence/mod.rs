//! # Persistence Module
//!
//! Loading and storing the player record.
//!
//! The game treats a save as one opaque JSON document. A missing save and a
//! broken save are reported differently so the caller can start a new game
//! quietly in the first case and warn in the second.

use crate::game::PlayerRecord;
use crate::{WayfarerError, WayfarerResult};
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Somewhere a player record can be saved to and loaded from.
pub trait SaveStore {
    /// Stores the whole record, replacing any previous save.
    fn save(&mut self, record: &PlayerRecord) -> WayfarerResult<()>;

    /// Loads the stored record.
    ///
    /// Returns [`WayfarerError::SaveNotFound`] when nothing has been saved.
    fn load(&self) -> WayfarerResult<PlayerRecord>;
}

/// A pretty-printed JSON save file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonSaveFile {
    path: PathBuf,
}

impl JsonSaveFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

impl SaveStore for JsonSaveFile {
    /// Writes to a sibling temp file and renames it over the save, so a
    /// crash mid-write never leaves a truncated save behind.
    fn save(&mut self, record: &PlayerRecord) -> WayfarerResult<()> {
        let json = record.save_to_json()?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        info!("Game saved to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> WayfarerResult<PlayerRecord> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(WayfarerError::SaveNotFound(self.path.clone()))
            }
            Err(e) => return Err(WayfarerError::Io(e)),
        };
        let record = PlayerRecord::load_from_json(&json)?;
        info!("Game loaded from {}", self.path.display());
        Ok(record)
    }
}

/// Keeps the save in memory. Used by tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Option<PlayerRecord>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `record`.
    pub fn with_record(record: PlayerRecord) -> Self {
        Self {
            record: Some(record),
            saves: 0,
        }
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, record: &PlayerRecord) -> WayfarerResult<()> {
        self.record = Some(record.clone());
        self.saves += 1;
        debug!("Saved record #{} in memory", self.saves);
        Ok(())
    }

    fn load(&self) -> WayfarerResult<PlayerRecord> {
        self.record
            .clone()
            .ok_or_else(|| WayfarerError::SaveNotFound(PathBuf::from("<memory>")))
    }
}

impl<S: SaveStore + ?Sized> SaveStore for Box<S> {
    fn save(&mut self, record: &PlayerRecord) -> WayfarerResult<()> {
        (**self).save(record)
    }

    fn load(&self) -> WayfarerResult<PlayerRecord> {
        (**self).load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.load(), Err(WayfarerError::SaveNotFound(_))));

        let player = PlayerRecord::new("Bedevere");
        store.save(&player).unwrap();
        assert_eq!(store.load().unwrap(), player);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_temp_path_sits_next_to_save() {
        let file = JsonSaveFile::new("saves/game.json");
        assert_eq!(file.temp_path(), PathBuf::from("saves/game.json.tmp"));
    }
}
