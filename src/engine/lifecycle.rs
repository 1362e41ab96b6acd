//=========================================================================
// Engine Lifecycle
//=========================================================================
//
// Platform commands, display/swapchain management and frame rendering.
//
// Window and graphics state:
// ```text
//   InitWindow ──► attempt_display_initialization ──► create_swapchain
//                                                        └─► init_gfx_objects
//                                                              └─► scenes.start_graphics
//   TermWindow ──► kill_swapchain ──► kill_gfx_objects ──► scenes.kill_graphics
//   InitWindow (different window) ──► kill_swapchain ──► create_swapchain
//
//   SwapchainChanged(reason) ──► kill_swapchain ──► create_swapchain
//   ResolutionChanged(w, h)  ──► surface size ──► scenes.set_screen_size
// ```
//
// Display failures are transient: the flag stays down and the game loop
// retries on its next iteration.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::display::{Display, SwapchainChangeReason};
use crate::core::platform_bridge::{AppCommand, EventSource};
use crate::error::DisplayError;
use super::{Engine, NativeEngineSavedState};

impl<E: EventSource, D: Display> Engine<E, D> {
    //=== Commands ========================================================

    /// Applies one platform lifecycle command.
    pub fn handle_command(&mut self, command: AppCommand) {
        debug!(target: "engine", "Command {:?}", command);

        match command {
            AppCommand::InitWindow(window) => {
                info!(
                    target: "engine",
                    "Window {:?} created ({}x{})",
                    window.handle,
                    window.width,
                    window.height
                );
                if self.swapchain.is_some() && self.window != Some(window) {
                    debug!(target: "engine", "Window replaced, rebuilding swapchain");
                    self.kill_swapchain();
                }
                self.window = Some(window);
                if self.attempt_display_initialization() {
                    self.create_swapchain();
                }
            }

            AppCommand::TermWindow => {
                info!(target: "engine", "Window terminated");
                self.kill_swapchain();
                self.window = None;
            }

            AppCommand::GainedFocus => {
                self.has_focus = true;
                self.saved_state.has_focus = true;
            }

            AppCommand::LostFocus => {
                self.has_focus = false;
                self.saved_state.has_focus = false;
            }

            AppCommand::Start => self.has_started = true,

            AppCommand::Stop => self.has_started = false,

            AppCommand::Pause => self.with_scenes(|scenes, ctx| scenes.on_pause(ctx)),

            AppCommand::Resume => self.with_scenes(|scenes, ctx| scenes.on_resume(ctx)),

            AppCommand::ConfigChanged => {
                debug!(target: "engine", "Configuration changed");
            }

            AppCommand::SaveState => {
                self.saved_state = NativeEngineSavedState {
                    has_focus: self.has_focus,
                };
                debug!(target: "engine", "Saved state {:?}", self.saved_state);
            }

            AppCommand::LowMemory => {
                self.services.memory_mut().on_low_memory();
                if self.window.is_none() {
                    self.kill_gfx_objects();
                }
            }

            AppCommand::WindowRedrawNeeded => {
                trace!(target: "engine", "Redraw requested");
            }

            AppCommand::Destroy => {
                info!(target: "engine", "Destroy requested, quitting");
                self.quitting = true;
            }
        }
    }

    //=== Display & Swapchain =============================================

    /// Initializes the display for the current window. Idempotent.
    ///
    /// Returns `false` (to be retried later) if there is no window or
    /// the display is not ready.
    pub fn attempt_display_initialization(&mut self) -> bool {
        if self.display_initialized {
            return true;
        }
        let Some(window) = self.window else {
            debug!(target: "engine::display", "No window, display initialization deferred");
            return false;
        };

        match self.display.initialize(&window) {
            Ok(format) => {
                info!(target: "engine::display", "Display initialized ({:?})", format);
                self.display_format = Some(format);
                self.display_initialized = true;
                true
            }
            Err(e) => {
                warn!(target: "engine::display", "Display initialization failed, will retry: {}", e);
                false
            }
        }
    }

    /// Creates a swapchain for the current window and brings up graphics
    /// objects. Returns `false` (to be retried later) on failure.
    pub fn create_swapchain(&mut self) -> bool {
        if self.has_swapchain {
            return true;
        }
        let (Some(window), Some(format)) = (self.window, self.display_format) else {
            debug!(target: "engine::display", "Swapchain creation deferred, display not ready");
            return false;
        };

        match self.display.create_swapchain(&window, format) {
            Ok(info) => {
                info!(
                    target: "engine::display",
                    "Swapchain created ({}x{}, {} images)",
                    info.width,
                    info.height,
                    info.image_count
                );
                self.swapchain = Some(info);
                self.has_swapchain = true;
                self.is_first_frame = true;
                self.surface_width = info.width;
                self.surface_height = info.height;
                self.init_gfx_objects();
                true
            }
            Err(e) => {
                warn!(target: "engine::display", "Swapchain creation failed, will retry: {}", e);
                false
            }
        }
    }

    /// Graphics objects exist once a swapchain does. Starts scene graphics.
    pub fn init_gfx_objects(&mut self) -> bool {
        if self.has_gfx_objects {
            return true;
        }
        if !self.has_swapchain {
            debug!(target: "engine::display", "No swapchain, graphics objects deferred");
            return false;
        }

        info!(target: "engine::display", "Initializing graphics objects");
        self.services.textures_mut().on_graphics_ready();
        self.has_gfx_objects = true;

        let (width, height) = (self.surface_width, self.surface_height);
        self.with_scenes(|scenes, ctx| {
            scenes.set_screen_size(width, height, ctx);
            scenes.start_graphics(ctx);
        });
        true
    }

    /// Kills scene graphics and drops graphics objects. Idempotent.
    pub fn kill_gfx_objects(&mut self) {
        if !self.has_gfx_objects {
            return;
        }
        info!(target: "engine::display", "Killing graphics objects");
        self.with_scenes(|scenes, ctx| scenes.kill_graphics(ctx));
        self.services.textures_mut().on_graphics_lost();
        self.has_gfx_objects = false;
    }

    /// Drops graphics objects, then releases the swapchain.
    pub(crate) fn kill_swapchain(&mut self) {
        self.kill_gfx_objects();
        self.acquired_frame = None;
        if let Some(info) = self.swapchain.take() {
            info!(target: "engine::display", "Releasing swapchain");
            self.display.release_swapchain(info.handle);
        }
        self.has_swapchain = false;
    }

    //=== Display Notifications ===========================================

    /// The display invalidated the swapchain; rebuild it.
    pub fn swapchain_changed(&mut self, reason: SwapchainChangeReason) {
        info!(target: "engine::display", "Swapchain changed: {:?}", reason);
        self.kill_swapchain();
        if self.window.is_some() {
            self.create_swapchain();
        }
    }

    /// The display resolution changed; record it and notify scenes.
    pub fn display_resolution_changed(&mut self, width: u32, height: u32) {
        info!(target: "engine::display", "Display resolution {}x{}", width, height);
        self.surface_width = width;
        self.surface_height = height;
        if let Some(window) = self.window.as_mut() {
            window.width = width;
            window.height = height;
        }
        self.with_scenes(|scenes, ctx| scenes.set_screen_size(width, height, ctx));
    }

    //=== Rendering =======================================================

    /// Acquires the next swapchain image. Returns `false` to skip the frame.
    pub fn prepare_to_render(&mut self) -> bool {
        if !self.has_swapchain {
            return false;
        }
        if !self.has_gfx_objects && !self.init_gfx_objects() {
            return false;
        }
        let Some(info) = self.swapchain else {
            return false;
        };

        match self.display.acquire_frame(info.handle) {
            Ok(frame) => {
                self.acquired_frame = Some(frame);
                true
            }
            Err(e @ (DisplayError::OutOfDate | DisplayError::SurfaceLost)) => {
                warn!(target: "engine::display", "Frame acquire failed: {}", e);
                self.swapchain_changed(SwapchainChangeReason::Lost);
                false
            }
            Err(e) => {
                debug!(target: "engine::display", "Skipping frame: {}", e);
                false
            }
        }
    }

    /// Runs the scenes for one frame, then presents.
    ///
    /// The first frame after swapchain creation carries a zero delta.
    pub fn do_frame(&mut self) {
        let now = Instant::now();
        let delta = if self.is_first_frame {
            Duration::ZERO
        } else {
            now.saturating_duration_since(self.last_frame_at)
        };
        self.last_frame_at = now;

        let frame = self.frame_info(delta);
        self.with_scenes_frame(frame, |scenes, ctx| scenes.do_frame(ctx));

        if let (Some(info), Some(frame)) = (self.swapchain, self.acquired_frame.take()) {
            match self.display.present_frame(info.handle, frame) {
                Ok(()) => {}
                Err(e @ (DisplayError::OutOfDate | DisplayError::SurfaceLost)) => {
                    warn!(target: "engine::display", "Present failed: {}", e);
                    self.swapchain_changed(SwapchainChangeReason::Lost);
                }
                Err(e) => {
                    debug!(target: "engine::display", "Present failed: {}", e);
                }
            }
        }

        self.is_first_frame = false;
        self.services.memory_mut().update();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
