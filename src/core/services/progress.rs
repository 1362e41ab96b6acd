//=========================================================================
// Progress Persistence
//=========================================================================
//
// Local + cloud save of the player's level, and the polled loader that
// restores it.
//
// Architecture:
// ```text
//   ProgressManager
//     ├─ checkpoint_interval, cloud_save_enabled
//     └─ DataLoaderStateMachine
//          ├─ local: Box<dyn ProgressStore>    (always written)
//          └─ cloud: Option<Box<dyn ProgressStore>>
//
//   Load: NotStarted → LoadingCloud → LoadingLocal → Completed | Failed
//                      (skipped when cloud is off)
// ```
//
// Blobs are opaque to the stores; the manager encodes `SavedProgress`
// as JSON. Cloud data is eventually consistent with local data, so the
// loader keeps whichever source reports the higher level.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::error::SaveError;

//=== Constants ===========================================================

/// Key under which progress blobs are stored.
pub const PROGRESS_KEY: &str = "progress";

//=== SavedProgress =======================================================

/// Persisted progress record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedProgress {
    pub level: u32,
}

impl SavedProgress {
    fn encode(&self) -> Result<Vec<u8>, SaveError> {
        serde_json::to_vec(self).map_err(|e| SaveError::Corrupt(e.to_string()))
    }

    fn decode(blob: &[u8]) -> Result<Self, SaveError> {
        serde_json::from_slice(blob).map_err(|e| SaveError::Corrupt(e.to_string()))
    }
}

//=== ProgressStore =======================================================

/// Key/blob storage backend (local disk, cloud service, memory).
pub trait ProgressStore {
    /// Reads the blob stored under `key`; `Ok(None)` if there is none.
    fn read(&mut self, key: &str) -> Result<Option<Vec<u8>>, SaveError>;

    fn write(&mut self, key: &str, blob: &[u8]) -> Result<(), SaveError>;
}

//--- FileProgressStore ---------------------------------------------------

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    dir: PathBuf,
}

impl FileProgressStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl ProgressStore for FileProgressStore {
    fn read(&mut self, key: &str) -> Result<Option<Vec<u8>>, SaveError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SaveError::Io(format!("cannot read {}: {}", path.display(), e))),
        }
    }

    fn write(&mut self, key: &str, blob: &[u8]) -> Result<(), SaveError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            SaveError::Io(format!("cannot create {}: {}", self.dir.display(), e))
        })?;

        // Write-then-rename keeps the previous save intact on failure.
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, blob)
            .map_err(|e| SaveError::Io(format!("cannot write {}: {}", staging.display(), e)))?;
        fs::rename(&staging, &path)
            .map_err(|e| SaveError::Io(format!("cannot replace {}: {}", path.display(), e)))?;

        debug!(target: "services", "Saved {:?}", path);
        Ok(())
    }
}

//--- MemoryProgressStore -------------------------------------------------

/// In-memory store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    blobs: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded progress under [`PROGRESS_KEY`], if any.
    pub fn saved_level(&self) -> Option<u32> {
        self.blobs
            .borrow()
            .get(PROGRESS_KEY)
            .and_then(|blob| SavedProgress::decode(blob).ok())
            .map(|progress| progress.level)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.blobs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.borrow().is_empty()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn read(&mut self, key: &str) -> Result<Option<Vec<u8>>, SaveError> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn write(&mut self, key: &str, blob: &[u8]) -> Result<(), SaveError> {
        self.blobs.borrow_mut().insert(key.to_string(), blob.to_vec());
        Ok(())
    }
}

//=== LoadState ===========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotStarted,
    LoadingCloud,
    LoadingLocal,
    Completed,
    Failed(SaveError),
}

//=== DataLoaderStateMachine ==============================================

/// Polled loader for saved progress. Also owns the stores used to save.
pub struct DataLoaderStateMachine {
    local: Box<dyn ProgressStore>,
    cloud: Option<Box<dyn ProgressStore>>,
    state: LoadState,
    cloud_level: Option<u32>,
    level_loaded: u32,
}

impl DataLoaderStateMachine {
    pub fn new(local: Box<dyn ProgressStore>, cloud: Option<Box<dyn ProgressStore>>) -> Self {
        Self {
            local,
            cloud,
            state: LoadState::NotStarted,
            cloud_level: None,
            level_loaded: 0,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn has_cloud(&self) -> bool {
        self.cloud.is_some()
    }

    /// True once loading finished, successfully or not.
    pub fn is_loading_completed(&self) -> bool {
        matches!(self.state, LoadState::Completed | LoadState::Failed(_))
    }

    /// Level restored by the last completed load (0 if none).
    pub fn level_loaded(&self) -> u32 {
        self.level_loaded
    }

    pub fn loading_percentage(&self) -> u8 {
        match self.state {
            LoadState::NotStarted => 0,
            LoadState::LoadingCloud => 25,
            LoadState::LoadingLocal => 60,
            LoadState::Completed | LoadState::Failed(_) => 100,
        }
    }

    //--- Loading ----------------------------------------------------------

    /// Restarts loading from scratch.
    pub(crate) fn begin(&mut self, use_cloud: bool) {
        self.cloud_level = None;
        self.level_loaded = 0;
        self.state = if use_cloud && self.cloud.is_some() {
            LoadState::LoadingCloud
        } else {
            LoadState::LoadingLocal
        };
        info!(target: "services", "Saved game load started ({:?})", self.state);
    }

    /// Advances loading by one stage and returns the new state.
    pub fn step(&mut self) -> &LoadState {
        match self.state {
            LoadState::LoadingCloud => {
                self.cloud_level = self.read_cloud();
                self.state = LoadState::LoadingLocal;
            }
            LoadState::LoadingLocal => {
                self.state = match Self::read_level(self.local.as_mut()) {
                    Ok(local) => {
                        self.level_loaded = local.unwrap_or(0).max(self.cloud_level.unwrap_or(0));
                        info!(target: "services", "Saved game loaded: level {}", self.level_loaded);
                        LoadState::Completed
                    }
                    Err(e) => match self.cloud_level {
                        Some(level) => {
                            warn!(target: "services", "Local load failed ({}), using cloud data", e);
                            self.level_loaded = level;
                            LoadState::Completed
                        }
                        None => {
                            warn!(target: "services", "Saved game load failed: {}", e);
                            LoadState::Failed(e)
                        }
                    },
                };
            }
            LoadState::NotStarted | LoadState::Completed | LoadState::Failed(_) => {}
        }
        &self.state
    }

    /// Steps until loading completes.
    pub fn run_to_completion(&mut self) -> &LoadState {
        if self.state == LoadState::NotStarted {
            return &self.state;
        }
        while !self.is_loading_completed() {
            self.step();
        }
        &self.state
    }

    //--- Saving -----------------------------------------------------------

    fn write_local(&mut self, progress: &SavedProgress) -> Result<(), SaveError> {
        self.local.write(PROGRESS_KEY, &progress.encode()?)
    }

    fn write_cloud(&mut self, progress: &SavedProgress) -> Result<(), SaveError> {
        let blob = progress.encode()?;
        match self.cloud.as_mut() {
            Some(cloud) => cloud.write(PROGRESS_KEY, &blob),
            None => Err(SaveError::Unavailable),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn read_cloud(&mut self) -> Option<u32> {
        let cloud = self.cloud.as_mut()?;
        match Self::read_level(cloud.as_mut()) {
            Ok(level) => level,
            Err(e) => {
                warn!(target: "services", "Cloud load failed, falling back to local: {}", e);
                None
            }
        }
    }

    fn read_level(store: &mut dyn ProgressStore) -> Result<Option<u32>, SaveError> {
        store
            .read(PROGRESS_KEY)?
            .map(|blob| SavedProgress::decode(&blob).map(|p| p.level))
            .transpose()
    }
}

impl fmt::Debug for DataLoaderStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataLoaderStateMachine")
            .field("state", &self.state)
            .field("has_cloud", &self.cloud.is_some())
            .field("level_loaded", &self.level_loaded)
            .finish()
    }
}

//=== ProgressManager =====================================================

/// Save/load policy: local always, cloud on checkpoints or when forced.
#[derive(Debug)]
pub struct ProgressManager {
    loader: DataLoaderStateMachine,
    checkpoint_interval: u32,
    cloud_save_enabled: bool,
}

impl ProgressManager {
    /// # Panics
    ///
    /// Panics if `checkpoint_interval == 0`.
    pub fn new(
        loader: DataLoaderStateMachine,
        checkpoint_interval: u32,
        cloud_save_enabled: bool,
    ) -> Self {
        assert!(checkpoint_interval > 0, "Checkpoint interval must be positive");
        Self {
            loader,
            checkpoint_interval,
            cloud_save_enabled,
        }
    }

    /// In-memory local store, no cloud.
    pub fn in_memory(checkpoint_interval: u32) -> Self {
        let loader = DataLoaderStateMachine::new(Box::new(MemoryProgressStore::new()), None);
        Self::new(loader, checkpoint_interval, false)
    }

    //--- Queries ----------------------------------------------------------

    /// Cloud save needs both the setting and a cloud store.
    pub fn is_cloud_save_enabled(&self) -> bool {
        self.cloud_save_enabled && self.loader.has_cloud()
    }

    pub fn checkpoint_interval(&self) -> u32 {
        self.checkpoint_interval
    }

    /// Levels divisible by the checkpoint interval are checkpoints.
    pub fn is_checkpoint_level(&self, level: u32) -> bool {
        level % self.checkpoint_interval == 0
    }

    pub fn data_state_machine(&self) -> &DataLoaderStateMachine {
        &self.loader
    }

    //--- Operations -------------------------------------------------------

    /// Starts loading saved progress, from the cloud first when enabled.
    pub fn begin_saved_game_load(&mut self) -> &mut DataLoaderStateMachine {
        let use_cloud = self.is_cloud_save_enabled();
        self.loader.begin(use_cloud);
        &mut self.loader
    }

    /// Saves locally, and to the cloud on checkpoint levels or when forced.
    ///
    /// Returns `false` if any attempted write failed.
    pub fn save_progress(&mut self, level: u32, force_save: bool) -> bool {
        let progress = SavedProgress { level };

        let local_ok = match self.loader.write_local(&progress) {
            Ok(()) => true,
            Err(e) => {
                warn!(target: "services", "Local save of level {} failed: {}", level, e);
                false
            }
        };

        let cloud_ok = if self.is_cloud_save_enabled()
            && (force_save || self.is_checkpoint_level(level))
        {
            self.save_game_to_cloud(&progress)
        } else {
            true
        };

        local_ok && cloud_ok
    }

    fn save_game_to_cloud(&mut self, progress: &SavedProgress) -> bool {
        match self.loader.write_cloud(progress) {
            Ok(()) => {
                info!(target: "services", "Level {} saved to cloud", progress.level);
                true
            }
            Err(e) => {
                warn!(target: "services", "Cloud save of level {} failed: {}", progress.level, e);
                false
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
