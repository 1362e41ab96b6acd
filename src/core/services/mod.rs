//=========================================================================
// Engine Services
//
// Subsystems owned by the engine and lent to scenes through
// `SceneContext`.
//
// Architecture:
// ```text
//   Engine
//     └─ Services
//          ├─ GameAssetManager   (load_asset)
//          ├─ TextureManager     (handles, residency)
//          ├─ TuningManager      (read-only parameters)
//          ├─ MemoryConsumer     (debug allocator)
//          ├─ VibrationHelper    (haptics)
//          ├─ ProgressManager    (local + cloud saves)
//          └─ input context      (active Input SDK context id)
// ```
//
// Each subsystem is reachable through a shared and a mutable accessor;
// there are no process-wide instances.
//
//=========================================================================

//=== Submodules ==========================================================

mod assets;
mod memory;
mod progress;
mod textures;
mod tuning;
mod vibration;

//=== Public API ==========================================================

pub use assets::GameAssetManager;
pub use memory::MemoryConsumer;
pub use progress::{
    DataLoaderStateMachine, FileProgressStore, LoadState, MemoryProgressStore, ProgressManager,
    ProgressStore, SavedProgress, PROGRESS_KEY,
};
pub use textures::{TextureHandle, TextureManager};
pub use tuning::TuningManager;
pub use vibration::{
    NullVibrator, SystemService, VibrationHelper, Vibrator, VIBRATION_MANAGER_API_LEVEL,
};

//=== Internal Dependencies ===============================================

use crate::config::{MemoryConsumerConfig, DEFAULT_CHECKPOINT_INTERVAL};

//=== InputContextId ======================================================

/// Identifier of an Input SDK context (a named set of input mappings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputContextId(pub u32);

//=== Services ============================================================

#[derive(Debug)]
pub struct Services {
    assets: GameAssetManager,
    textures: TextureManager,
    tuning: TuningManager,
    memory: MemoryConsumer,
    vibration: VibrationHelper,
    progress: ProgressManager,
    input_context: Option<InputContextId>,
}

impl Services {
    pub fn new(
        assets: GameAssetManager,
        tuning: TuningManager,
        memory: MemoryConsumer,
        vibration: VibrationHelper,
        progress: ProgressManager,
    ) -> Self {
        Self {
            assets,
            textures: TextureManager::new(),
            tuning,
            memory,
            vibration,
            progress,
            input_context: None,
        }
    }

    /// Services that touch neither disk nor hardware.
    pub fn in_memory() -> Self {
        Self::new(
            GameAssetManager::new("."),
            TuningManager::new(),
            MemoryConsumer::new(MemoryConsumerConfig::default()),
            VibrationHelper::new(0, Box::new(NullVibrator)),
            ProgressManager::in_memory(DEFAULT_CHECKPOINT_INTERVAL),
        )
    }

    //--- Accessors --------------------------------------------------------

    pub fn assets(&self) -> &GameAssetManager {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut GameAssetManager {
        &mut self.assets
    }

    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureManager {
        &mut self.textures
    }

    pub fn tuning(&self) -> &TuningManager {
        &self.tuning
    }

    pub fn memory(&self) -> &MemoryConsumer {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut MemoryConsumer {
        &mut self.memory
    }

    pub fn vibration(&self) -> &VibrationHelper {
        &self.vibration
    }

    pub fn vibration_mut(&mut self) -> &mut VibrationHelper {
        &mut self.vibration
    }

    pub fn progress(&self) -> &ProgressManager {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressManager {
        &mut self.progress
    }

    //--- Input SDK Context ------------------------------------------------

    pub fn input_context(&self) -> Option<InputContextId> {
        self.input_context
    }

    pub fn set_input_context(&mut self, context: InputContextId) {
        self.input_context = Some(context);
    }

    pub fn clear_input_context(&mut self) {
        self.input_context = None;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
