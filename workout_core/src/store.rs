//! Persistence of trainings and custom exercises.
//!
//! The [`Storage`] port loads and saves a whole [`Snapshot`] at once.
//! [`JsonStore`] keeps each collection in its own JSON file with file
//! locking and atomic replacement; [`MemoryStore`] keeps it in memory.

use crate::{Error, Exercise, Result, Training};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::NamedTempFile;

/// File holding every training
pub const TRAININGS_FILE: &str = "trainings.json";
/// File holding user-created exercises
pub const CUSTOM_EXERCISES_FILE: &str = "custom_exercises.json";

/// Everything that is persisted
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub trainings: Vec<Training>,
    pub custom_exercises: Vec<Exercise>,
}

/// Load/save capability for the persisted collections
pub trait Storage {
    fn load(&self) -> Result<Snapshot>;
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

/// JSON-file store rooted at a data directory
#[derive(Clone, Debug)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn trainings_path(&self) -> PathBuf {
        self.dir.join(TRAININGS_FILE)
    }

    pub fn custom_exercises_path(&self) -> PathBuf {
        self.dir.join(CUSTOM_EXERCISES_FILE)
    }
}

impl Storage for JsonStore {
    fn load(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            trainings: load_collection(&self.trainings_path())?,
            custom_exercises: load_collection(&self.custom_exercises_path())?,
        })
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        save_collection(&self.trainings_path(), &snapshot.trainings)?;
        save_collection(&self.custom_exercises_path(), &snapshot.custom_exercises)?;
        Ok(())
    }
}

/// Load a JSON array with shared locking
///
/// Returns an empty collection if the file doesn't exist.
/// If the file is unreadable or corrupted, logs a warning and returns empty.
fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        tracing::info!("No data file at {:?}, starting empty", path);
        return Ok(Vec::new());
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Unable to open {:?}: {}. Starting empty.", path, e);
            return Ok(Vec::new());
        }
    };

    if let Err(e) = file.lock_shared() {
        tracing::warn!("Unable to lock {:?}: {}. Starting empty.", path, e);
        return Ok(Vec::new());
    }

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    if let Err(e) = reader.read_to_string(&mut contents) {
        let _ = file.unlock();
        tracing::warn!("Failed to read {:?}: {}. Starting empty.", path, e);
        return Ok(Vec::new());
    }

    file.unlock()?;

    match serde_json::from_str::<Vec<T>>(&contents) {
        Ok(items) => {
            tracing::debug!("Loaded {} records from {:?}", items.len(), path);
            Ok(items)
        }
        Err(e) => {
            tracing::warn!("Failed to parse {:?}: {}. Starting empty.", path, e);
            Ok(Vec::new())
        }
    }
}

/// Write a JSON array atomically under an exclusive lock
///
/// Writes to a temp file in the same directory, syncs it, then renames it
/// over the original.
fn save_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Storage(format!("{:?} has no parent directory", path)))?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        serde_json::to_writer_pretty(&mut writer, items)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved {} records to {:?}", items.len(), path);
    Ok(())
}

/// In-memory store; clones share the same snapshot
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    snapshot: Rc<RefCell<Snapshot>>,
    saves: Rc<RefCell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Rc::new(RefCell::new(snapshot)),
            saves: Rc::default(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    /// Number of times `save` has been called
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl Storage for MemoryStore {
    fn load(&self) -> Result<Snapshot> {
        Ok(self.snapshot())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        *self.snapshot.borrow_mut() = snapshot.clone();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
