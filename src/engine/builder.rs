//=========================================================================
// Engine Builder
//=========================================================================
//
// Fluent configuration of an `Engine` before construction.
//
//   EngineBuilder::new()
//       .with_config(config)          // or EngineConfig::load(path)?
//       .with_checkpoint_interval(5)
//       .with_cloud_store(store)
//       .build(events, display)?
//
// Subsystems are created eagerly in `build`. The only host fault detected
// here is a platform application without an API level.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Instant;

use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::config::EngineConfig;
use crate::core::display::Display;
use crate::core::platform_bridge::{EventSource, PlatformApp};
use crate::core::scene::SceneManager;
use crate::core::services::{
    DataLoaderStateMachine, FileProgressStore, GameAssetManager, MemoryConsumer, NullVibrator,
    ProgressManager, ProgressStore, Services, TuningManager, VibrationHelper, Vibrator,
};
use crate::error::EngineError;
use super::{Engine, NativeEngineSavedState};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Config**: [`EngineConfig::default`]
/// - **Platform app**: [`PlatformApp::desktop`]
/// - **Local store**: JSON files under `config.saves_dir`
/// - **Cloud store**: none
/// - **Vibrator**: [`NullVibrator`]
///
/// # Examples
///
/// ```no_run
/// use tunnel_engine::prelude::*;
///
/// let (_sender, events) = ChannelEventSource::channel();
/// let engine = EngineBuilder::new()
///     .with_checkpoint_interval(5)
///     .with_cloud_save(false)
///     .build(events, VirtualDisplay::new())
///     .unwrap();
/// ```
pub struct EngineBuilder {
    config: EngineConfig,
    platform_app: PlatformApp,
    local_store: Option<Box<dyn ProgressStore>>,
    cloud_store: Option<Box<dyn ProgressStore>>,
    vibrator: Option<Box<dyn Vibrator>>,
    saved_state: Option<NativeEngineSavedState>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            platform_app: PlatformApp::desktop(),
            local_store: None,
            cloud_store: None,
            vibrator: None,
            saved_state: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replaces the whole configuration. Later `with_*` calls still apply.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets how many levels lie between cloud checkpoints.
    ///
    /// Default: 4
    ///
    /// # Panics
    ///
    /// Panics if `interval == 0`.
    pub fn with_checkpoint_interval(mut self, interval: u32) -> Self {
        assert!(interval > 0, "Checkpoint interval must be positive, got {}", interval);
        self.config.checkpoint_interval = interval;
        self
    }

    pub fn with_cloud_save(mut self, enabled: bool) -> Self {
        self.config.cloud_save_enabled = enabled;
        self
    }

    /// Cloud backend. Cloud saving also needs [`Self::with_cloud_save`].
    pub fn with_cloud_store(mut self, store: impl ProgressStore + 'static) -> Self {
        self.cloud_store = Some(Box::new(store));
        self
    }

    /// Replaces the on-disk local store.
    pub fn with_local_store(mut self, store: impl ProgressStore + 'static) -> Self {
        self.local_store = Some(Box::new(store));
        self
    }

    pub fn with_vibrator(mut self, vibrator: impl Vibrator + 'static) -> Self {
        self.vibrator = Some(Box::new(vibrator));
        self
    }

    pub fn with_platform_app(mut self, app: PlatformApp) -> Self {
        self.platform_app = app;
        self
    }

    /// Restores a snapshot taken by a previous `SaveState` command.
    pub fn with_saved_state(mut self, state: NativeEngineSavedState) -> Self {
        self.saved_state = Some(state);
        self
    }

    /// Builds the engine, creating every subsystem.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Config`] if the configuration is invalid or the
    ///   tuning file cannot be loaded
    /// - [`EngineError::HostFault`] if the platform app reports no API level
    pub fn build<E: EventSource, D: Display>(
        self,
        events: E,
        display: D,
    ) -> Result<Engine<E, D>, EngineError> {
        let config = self.config;
        config.validate()?;

        if self.platform_app.api_level == 0 {
            error!(target: "engine", "Platform application reported no API level");
            return Err(EngineError::HostFault(
                "platform application reported no API level".into(),
            ));
        }

        let tuning = match &config.tuning_file {
            Some(path) => TuningManager::load(path)?,
            None => TuningManager::new(),
        };

        let local = self
            .local_store
            .unwrap_or_else(|| Box::new(FileProgressStore::new(&config.saves_dir)));
        let progress = ProgressManager::new(
            DataLoaderStateMachine::new(local, self.cloud_store),
            config.checkpoint_interval,
            config.cloud_save_enabled,
        );

        let vibrator = self.vibrator.unwrap_or_else(|| Box::new(NullVibrator));

        let services = Services::new(
            GameAssetManager::new(&config.assets_root),
            tuning,
            MemoryConsumer::new(config.memory_consumer.clone()),
            VibrationHelper::new(self.platform_app.api_level, vibrator),
            progress,
        );

        let saved_state = self.saved_state.unwrap_or_default();

        info!(
            target: "engine",
            "Building engine (API level: {}, checkpoint interval: {}, cloud save: {})",
            self.platform_app.api_level,
            config.checkpoint_interval,
            config.cloud_save_enabled
        );

        Ok(Engine {
            events,
            display,
            services,
            scenes: SceneManager::with_screen_size(
                config.initial_screen_width,
                config.initial_screen_height,
            ),

            has_focus: saved_state.has_focus,
            has_started: false,
            display_initialized: false,
            has_swapchain: false,
            quitting: false,
            has_gfx_objects: false,
            is_first_frame: true,

            api_level: self.platform_app.api_level,
            screen_density: self.platform_app.screen_density,
            surface_width: config.initial_screen_width,
            surface_height: config.initial_screen_height,
            active_game_controller_index: 0,
            active_axis_bitfield: 0,
            joy_x: 0.0,
            joy_y: 0.0,

            window: None,
            display_format: None,
            swapchain: None,
            acquired_frame: None,
            last_frame_at: Instant::now(),
            saved_state,
            config,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
