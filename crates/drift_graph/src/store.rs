//! Persistence for per-unit snapshots between builds.
//!
//! The store is a single `snapshots.json` under the orchestrator's state
//! directory, keyed by unit path. Loading is fail-safe: a missing,
//! corrupt, or incompatible store comes back empty, which just means
//! every unit takes the first-build path. Never a fatal error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::snapshot::UnitSnapshot;

/// Name of the store file within the state directory.
const STORE_FILE: &str = "snapshots.json";

/// All persisted unit snapshots from the previous build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotStore {
    /// Producer version that wrote this store. A different version
    /// invalidates everything; snapshot layout is not versioned further.
    pub producer: String,

    /// Per-unit snapshots, keyed by root unit path.
    pub units: BTreeMap<PathBuf, UnitSnapshot>,
}

impl SnapshotStore {
    /// Creates an empty store for the given producer version.
    pub fn new(producer: &str) -> Self {
        Self {
            producer: producer.to_string(),
            units: BTreeMap::new(),
        }
    }

    /// Loads the store, or returns an empty one.
    ///
    /// Fail-safe: missing file, unparseable JSON, or a producer version
    /// mismatch all yield an empty store.
    pub fn load_or_create(state_dir: &Path, producer: &str) -> Self {
        Self::load(state_dir)
            .filter(|s| s.producer == producer)
            .unwrap_or_else(|| Self::new(producer))
    }

    fn load(state_dir: &Path) -> Option<Self> {
        let path = state_dir.join(STORE_FILE);
        let content = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Saves the store, creating the state directory if needed.
    pub fn save(&self, state_dir: &Path) -> Result<(), StoreError> {
        std::fs::create_dir_all(state_dir).map_err(|e| StoreError::Io {
            path: state_dir.to_path_buf(),
            source: e,
        })?;
        let path = state_dir.join(STORE_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|e| StoreError::Serialization {
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|e| StoreError::Io { path, source: e })
    }

    /// Returns the previous snapshot for a unit, if any.
    pub fn get(&self, unit: &Path) -> Option<&UnitSnapshot> {
        self.units.get(unit)
    }

    /// Records a unit's fresh snapshot, replacing the previous one.
    pub fn record(&mut self, unit: PathBuf, snapshot: UnitSnapshot) {
        self.units.insert(unit, snapshot);
    }

    /// Drops a unit's snapshot (e.g. the unit was removed from the build).
    pub fn remove(&mut self, unit: &Path) {
        self.units.remove(unit);
    }
}
