//=========================================================================
// Tunnel Engine
//
// Main entry point and coordinator for the runtime core.
//
// Architecture:
// ```text
//     EngineBuilder ──build(events, display)──► Engine ──game_loop()──► [Runtime]
//
//     Engine
//       ├─ events: EventSource      (platform commands, input, display changes)
//       ├─ display: Display         (swapchain provider)
//       ├─ services: Services       (assets, textures, tuning, saves, ...)
//       └─ scenes: SceneManager     (current scene + pending transition)
// ```
//
// Readiness chain:
//   display_initialized ◄── has_swapchain ◄── has_gfx_objects
//   (each flag may only be set while the one to its left is set)
//
// Loop iteration:
//   poll (blocking unless animating) → drain events → retry swapchain
//   → if animating: prepare_to_render → do_frame (scenes, present)
//
//=========================================================================

//=== Module Declarations =================================================

mod builder;
mod input;
mod lifecycle;
mod state;

//=== Public API ==========================================================

pub use builder::EngineBuilder;
pub use state::NativeEngineSavedState;

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use crate::config::EngineConfig;
use crate::core::display::{Display, DisplayChange, DisplayFormat, FrameHandle, SwapchainInfo};
use crate::core::platform_bridge::{EventSource, NativeWindow, PlatformEvent};
use crate::core::scene::{FrameInfo, Scene, SceneContext, SceneManager};
use crate::core::services::{
    DataLoaderStateMachine, GameAssetManager, InputContextId, MemoryConsumer, Services,
    TextureManager, TuningManager, VibrationHelper,
};
use crate::error::EngineError;

//=== Engine ==============================================================

/// Runtime core: platform lifecycle, swapchain and scene driver.
///
/// Create via [`EngineBuilder`], hand it an initial scene with
/// [`Engine::request_new_scene`], then call [`Engine::game_loop`].
///
/// # Examples
///
/// ```no_run
/// use tunnel_engine::prelude::*;
///
/// struct Title;
/// impl Scene for Title {}
///
/// let (sender, events) = ChannelEventSource::channel();
/// let mut engine = EngineBuilder::new().build(events, VirtualDisplay::new()).unwrap();
/// engine.request_new_scene(Box::new(Title));
///
/// // Host glue thread feeds `sender`; this call blocks until Destroy.
/// engine.game_loop().unwrap();
/// # drop(sender);
/// ```
pub struct Engine<E: EventSource, D: Display> {
    config: EngineConfig,
    events: E,
    display: D,
    services: Services,
    scenes: SceneManager,

    //--- Readiness Flags ---------------------------------------------------
    has_focus: bool,
    has_started: bool,
    display_initialized: bool,
    has_swapchain: bool,
    quitting: bool,
    has_gfx_objects: bool,
    is_first_frame: bool,

    //--- Numeric State -----------------------------------------------------
    api_level: u32,
    screen_density: u32,
    surface_width: u32,
    surface_height: u32,
    active_game_controller_index: i32,
    active_axis_bitfield: u64,
    joy_x: f32,
    joy_y: f32,

    //--- Handles -----------------------------------------------------------
    window: Option<NativeWindow>,
    display_format: Option<DisplayFormat>,
    swapchain: Option<SwapchainInfo>,
    acquired_frame: Option<FrameHandle>,
    last_frame_at: Instant,
    saved_state: NativeEngineSavedState,
}

impl<E: EventSource, D: Display> Engine<E, D> {
    //--- Execution --------------------------------------------------------

    /// Runs until quitting, then shuts down in order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Platform`] when the event source fails.
    /// That is a host fault; the caller is expected to terminate.
    pub fn game_loop(&mut self) -> Result<(), EngineError> {
        info!(target: "engine", "Entering game loop");

        let mut result = Ok(());
        while !self.quitting {
            if let Err(e) = self.tick() {
                error!(target: "engine", "Host fault, leaving game loop: {}", e);
                result = Err(e);
                break;
            }
        }

        self.shutdown();
        info!(target: "engine", "Game loop exited");
        result
    }

    /// One loop iteration: wait for events, drain them, render if animating.
    pub fn tick(&mut self) -> Result<(), EngineError> {
        let mut next = self.events.poll_event(self.poll_timeout())?;
        while let Some(event) = next {
            self.handle_event(event);
            if self.quitting {
                return Ok(());
            }
            next = self.events.poll_event(Some(Duration::ZERO))?;
        }

        // Swapchain creation failed earlier; retry now.
        if self.window.is_some() && !self.has_swapchain {
            if self.attempt_display_initialization() {
                self.create_swapchain();
            }
        }

        if self.is_animating() && self.prepare_to_render() {
            self.do_frame();
        }

        self.check_invariants();
        Ok(())
    }

    /// Dispatches one platform event.
    pub fn handle_event(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::Command(command) => self.handle_command(command),
            PlatformEvent::Input(input) => {
                self.handle_input(input);
            }
            PlatformEvent::Display(DisplayChange::SwapchainChanged(reason)) => {
                self.swapchain_changed(reason)
            }
            PlatformEvent::Display(DisplayChange::ResolutionChanged { width, height }) => {
                self.display_resolution_changed(width, height)
            }
        }
        self.check_invariants();
    }

    /// Focused, with a window and a swapchain.
    pub fn is_animating(&self) -> bool {
        self.has_focus && self.window.is_some() && self.has_swapchain
    }

    /// `Some(ZERO)` while animating, the retry interval while a window
    /// waits for its swapchain, otherwise block.
    fn poll_timeout(&self) -> Option<Duration> {
        if self.is_animating() {
            Some(Duration::ZERO)
        } else if self.window.is_some() && !self.has_swapchain {
            Some(self.config.resource_retry_interval())
        } else {
            None
        }
    }

    //--- Scenes -----------------------------------------------------------

    /// Queues `scene`; it is installed at the start of the next frame.
    pub fn request_new_scene(&mut self, scene: Box<dyn Scene>) {
        self.scenes.request_new_scene(scene);
    }

    pub fn scene_manager(&self) -> &SceneManager {
        &self.scenes
    }

    /// Runs `f` with the scene manager and a context over the services.
    ///
    /// Quit requests made by scenes are applied afterwards.
    pub(crate) fn with_scenes<R>(
        &mut self,
        f: impl FnOnce(&mut SceneManager, &mut SceneContext<'_>) -> R,
    ) -> R {
        let frame = self.frame_info(Duration::ZERO);
        self.with_scenes_frame(frame, f)
    }

    pub(crate) fn with_scenes_frame<R>(
        &mut self,
        frame: FrameInfo,
        f: impl FnOnce(&mut SceneManager, &mut SceneContext<'_>) -> R,
    ) -> R {
        let mut ctx = SceneContext::new(&mut self.services, frame);
        let result = f(&mut self.scenes, &mut ctx);

        if let Some(scene) = ctx.take_requested_scene() {
            self.scenes.request_new_scene(scene);
        }
        if ctx.quit_requested() && !self.quitting {
            info!(target: "engine", "Quit requested by scene");
            self.quitting = true;
        }
        result
    }

    fn frame_info(&self, delta: Duration) -> FrameInfo {
        FrameInfo {
            first_frame: self.is_first_frame,
            delta,
            width: self.surface_width,
            height: self.surface_height,
        }
    }

    //--- Progress ---------------------------------------------------------

    /// Starts loading saved progress (cloud first when enabled).
    pub fn begin_saved_game_load(&mut self) -> &mut DataLoaderStateMachine {
        self.services.progress_mut().begin_saved_game_load()
    }

    /// Saves locally, and to the cloud on checkpoints or when forced.
    pub fn save_progress(&mut self, level: u32, force_save: bool) -> bool {
        self.services.progress_mut().save_progress(level, force_save)
    }

    pub fn is_checkpoint_level(&self, level: u32) -> bool {
        self.services.progress().is_checkpoint_level(level)
    }

    pub fn is_cloud_save_enabled(&self) -> bool {
        self.services.progress().is_cloud_save_enabled()
    }

    pub fn data_state_machine(&self) -> &DataLoaderStateMachine {
        self.services.progress().data_state_machine()
    }

    //--- Shutdown ---------------------------------------------------------

    /// Releases graphics, the swapchain and every scene. Idempotent; also
    /// runs when the engine is dropped.
    pub fn shutdown(&mut self) {
        debug!(target: "engine", "Shutting down");
        self.kill_swapchain();
        self.with_scenes(|scenes, ctx| scenes.shutdown(ctx));
        self.check_invariants();
    }

    /// Asks the loop to exit after the current iteration.
    pub fn quit(&mut self) {
        self.quitting = true;
    }

    /// `has_gfx_objects ⇒ has_swapchain ⇒ display_initialized`.
    pub fn invariants_hold(&self) -> bool {
        (!self.has_gfx_objects || self.has_swapchain)
            && (!self.has_swapchain || self.display_initialized)
    }

    fn check_invariants(&self) {
        debug_assert!(
            self.invariants_hold(),
            "Readiness chain broken: gfx={} swapchain={} display={}",
            self.has_gfx_objects,
            self.has_swapchain,
            self.display_initialized
        );
    }

    //--- Accessors --------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut Services {
        &mut self.services
    }

    pub fn game_asset_manager(&self) -> &GameAssetManager {
        self.services.assets()
    }

    pub fn texture_manager(&self) -> &TextureManager {
        self.services.textures()
    }

    pub fn tuning_manager(&self) -> &TuningManager {
        self.services.tuning()
    }

    pub fn memory_consumer(&self) -> &MemoryConsumer {
        self.services.memory()
    }

    pub fn vibration_helper(&mut self) -> &mut VibrationHelper {
        self.services.vibration_mut()
    }

    pub fn set_input_sdk_context(&mut self, context: InputContextId) {
        self.services.set_input_context(context);
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn event_source_mut(&mut self) -> &mut E {
        &mut self.events
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn is_display_initialized(&self) -> bool {
        self.display_initialized
    }

    pub fn has_swapchain(&self) -> bool {
        self.has_swapchain
    }

    pub fn has_gfx_objects(&self) -> bool {
        self.has_gfx_objects
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn is_first_frame(&self) -> bool {
        self.is_first_frame
    }

    pub fn api_level(&self) -> u32 {
        self.api_level
    }

    pub fn screen_density(&self) -> u32 {
        self.screen_density
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.surface_width, self.surface_height)
    }

    pub fn window(&self) -> Option<&NativeWindow> {
        self.window.as_ref()
    }

    pub fn swapchain(&self) -> Option<&SwapchainInfo> {
        self.swapchain.as_ref()
    }

    pub fn display_format(&self) -> Option<DisplayFormat> {
        self.display_format
    }

    pub fn active_game_controller_index(&self) -> i32 {
        self.active_game_controller_index
    }

    pub fn set_active_game_controller_index(&mut self, index: i32) {
        self.active_game_controller_index = index;
    }

    pub fn active_axis_bitfield(&self) -> u64 {
        self.active_axis_bitfield
    }

    /// Latest snapshot for the host to persist.
    pub fn saved_state(&self) -> NativeEngineSavedState {
        self.saved_state
    }
}

//=== Teardown ============================================================

/// Engines driven with [`Engine::tick`] are torn down on drop, so the
/// scene and swapchain are released whichever way the loop ends.
impl<E: EventSource, D: Display> Drop for Engine<E, D> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        self.shutdown();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::display::VirtualDisplay;
    use crate::core::platform_bridge::{AppCommand, ChannelEventSource, WindowHandle};
    use crate::core::services::MemoryProgressStore;
    use crossbeam_channel::Sender;

    fn engine() -> (Sender<PlatformEvent>, Engine<ChannelEventSource, VirtualDisplay>) {
        let (sender, events) = ChannelEventSource::channel();
        let engine = EngineBuilder::new()
            .with_local_store(MemoryProgressStore::new())
            .build(events, VirtualDisplay::new())
            .unwrap();
        (sender, engine)
    }

    fn window() -> NativeWindow {
        NativeWindow {
            handle: WindowHandle(1),
            width: 640,
            height: 480,
        }
    }

    //=====================================================================
    // Game Loop
    //=====================================================================

    #[test]
    fn destroy_ends_game_loop() {
        let (sender, mut engine) = engine();
        sender.send(AppCommand::Destroy.into()).unwrap();

        engine.game_loop().unwrap();
        assert!(engine.is_quitting());
    }

    #[test]
    fn disconnected_source_is_host_fault() {
        let (sender, mut engine) = engine();
        drop(sender);

        let result = engine.game_loop();
        assert!(matches!(result, Err(EngineError::Platform(_))));
    }

    #[test]
    fn tick_renders_once_animating() {
        let (sender, mut engine) = engine();
        sender.send(AppCommand::InitWindow(window()).into()).unwrap();
        sender.send(AppCommand::GainedFocus.into()).unwrap();

        engine.tick().unwrap();
        assert!(engine.is_animating());
        assert_eq!(engine.display().presented_frames(), 1);

        engine.tick().unwrap();
        assert_eq!(engine.display().presented_frames(), 2, "Animating ticks never block");
    }

    #[test]
    fn poll_timeout_follows_readiness() {
        let (_sender, mut engine) = engine();
        assert_eq!(engine.poll_timeout(), None, "No window: block");

        engine.window = Some(window());
        assert_eq!(
            engine.poll_timeout(),
            Some(engine.config().resource_retry_interval()),
            "Window without swapchain: retry"
        );

        engine.handle_command(AppCommand::InitWindow(window()));
        engine.handle_command(AppCommand::GainedFocus);
        assert_eq!(engine.poll_timeout(), Some(Duration::ZERO));
    }

    //=====================================================================
    // Progress Delegation
    //=====================================================================

    #[test]
    fn checkpoint_levels_follow_interval() {
        let (_sender, engine) = engine();
        assert!(engine.is_checkpoint_level(0));
        assert!(engine.is_checkpoint_level(8));
        assert!(!engine.is_checkpoint_level(9));
    }

    #[test]
    fn save_then_load_restores_level() {
        let (_sender, mut engine) = engine();
        assert!(engine.save_progress(3, false));

        let loader = engine.begin_saved_game_load();
        loader.run_to_completion();
        assert_eq!(loader.level_loaded(), 3);
        assert!(engine.data_state_machine().is_loading_completed());
    }
}
