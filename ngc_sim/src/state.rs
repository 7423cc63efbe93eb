//! Machine state persistence.
//!
//! Saves the simulated machine's modal state and position across runs.
//! State is persisted using bincode for compact binary serialization.

use crate::error::SimError;
use crate::machine::MachineState;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Machine state as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PersistedMachineState {
    /// Version of state format (for migration)
    pub version: u32,
    /// Modal state and position
    pub state: MachineState,
    /// Timestamp of last save (Unix epoch seconds)
    pub saved_at: u64,
}

impl PersistedMachineState {
    /// Current state format version.
    pub const CURRENT_VERSION: u32 = 1;

    /// Wrap machine state in the current format.
    pub fn new(state: MachineState) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            state,
            saved_at: 0,
        }
    }
}

/// State persistence manager.
pub struct StatePersistence {
    path: PathBuf,
}

impl StatePersistence {
    /// Create a persistence manager for `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// State file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save state to file, stamping the save time.
    pub fn save(&self, state: &MachineState) -> Result<(), SimError> {
        debug!("Saving machine state to {:?}", self.path);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SimError::Persistence(format!("Failed to create directory: {}", e))
            })?;
        }

        let mut persisted = PersistedMachineState::new(state.clone());
        persisted.saved_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let file = File::create(&self.path).map_err(|e| {
            SimError::Persistence(format!("Failed to create state file: {}", e))
        })?;
        bincode::serialize_into(BufWriter::new(file), &persisted).map_err(|e| {
            SimError::Persistence(format!("Failed to serialize state: {}", e))
        })?;

        info!("Saved machine state to {:?}", self.path);
        Ok(())
    }

    /// Load state from file.
    ///
    /// Returns `Ok(None)` if the file does not exist or was written by a
    /// different format version.
    pub fn load(&self) -> Result<Option<MachineState>, SimError> {
        debug!("Loading machine state from {:?}", self.path);

        if !self.path.exists() {
            debug!("State file does not exist, starting fresh");
            return Ok(None);
        }

        let file = File::open(&self.path)
            .map_err(|e| SimError::Persistence(format!("Failed to open state file: {}", e)))?;
        let persisted: PersistedMachineState = bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| SimError::Persistence(format!("Failed to deserialize state: {}", e)))?;

        if persisted.version != PersistedMachineState::CURRENT_VERSION {
            warn!(
                "State file version {} differs from current {}, starting fresh",
                persisted.version,
                PersistedMachineState::CURRENT_VERSION
            );
            return Ok(None);
        }

        info!(
            "Loaded machine state from {:?} (saved at {})",
            self.path, persisted.saved_at
        );
        Ok(Some(persisted.state))
    }

    /// Delete the state file.
    pub fn delete(&self) -> Result<(), SimError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                SimError::Persistence(format!("Failed to delete state file: {}", e))
            })?;
            info!("Deleted state file {:?}", self.path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngc_common::canon::types::{MotionMode, Units};
    use tempfile::tempdir;

    fn sample_state() -> MachineState {
        MachineState {
            motion_mode: MotionMode::StraightFeed,
            position: [1.0, -2.0, 3.5],
            units: Units::Inches,
            feed_rate: 254.0,
            active_tool: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let persistence = StatePersistence::new(dir.path().join("nested/state.bin"));

        persistence.save(&sample_state()).unwrap();
        assert_eq!(persistence.load().unwrap(), Some(sample_state()));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let persistence = StatePersistence::new(dir.path().join("missing.bin"));
        assert_eq!(persistence.load().unwrap(), None);
    }

    #[test]
    fn test_version_mismatch_starts_fresh() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.bin");
        let mut old = PersistedMachineState::new(sample_state());
        old.version = 99;
        let file = File::create(&path).unwrap();
        bincode::serialize_into(BufWriter::new(file), &old).unwrap();

        assert_eq!(StatePersistence::new(&path).load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.bin");
        fs::write(&path, b"xx").unwrap();

        let result = StatePersistence::new(&path).load();
        assert!(matches!(result, Err(SimError::Persistence(_))));
    }

    #[test]
    fn test_delete() {
        let dir = tempdir().unwrap();
        let persistence = StatePersistence::new(dir.path().join("state.bin"));
        persistence.save(&MachineState::default()).unwrap();
        assert!(persistence.path().exists());
        persistence.delete().unwrap();
        assert!(!persistence.path().exists());
        persistence.delete().unwrap();
    }
}
