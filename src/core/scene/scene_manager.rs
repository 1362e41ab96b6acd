//=========================================================================
// Scene Manager
//=========================================================================
//
// Owns the current scene, sequences transitions, and forwards graphics
// and input events to the current scene only while they are valid.
//
// States:
// ```text
//   NoScene ──install(Some)──► SceneActive(NoGraphics) ◄──kill/start──►
//                              SceneActive(WithGraphics)
//   any ──install(None)──► NoScene
// ```
//
// `request_new_scene` only records a pending scene; installation happens
// at the start of the next `do_frame`. Hooks may request scenes through
// their `SceneContext`; the manager absorbs such requests after every
// hook call so they follow the same deferred path.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::config::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH};
use crate::core::input::{LogicalKey, PointerCoords};
use super::{Scene, SceneContext};

//=== SceneState ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    NoScene,
    SceneActiveNoGraphics,
    SceneActiveWithGraphics,
}

//=== Forward Guard =======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requires {
    Scene,
    SceneAndGraphics,
}

//=== SceneManager ========================================================

pub struct SceneManager {
    current: Option<Box<dyn Scene>>,
    pending: Option<Box<dyn Scene>>,
    has_graphics: bool,
    screen_width: u32,
    screen_height: u32,
}

impl SceneManager {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::with_screen_size(DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT)
    }

    pub fn with_screen_size(width: u32, height: u32) -> Self {
        Self {
            current: None,
            pending: None,
            has_graphics: false,
            screen_width: width,
            screen_height: height,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> SceneState {
        match (&self.current, self.has_graphics) {
            (None, _) => SceneState::NoScene,
            (Some(_), false) => SceneState::SceneActiveNoGraphics,
            (Some(_), true) => SceneState::SceneActiveWithGraphics,
        }
    }

    pub fn has_graphics(&self) -> bool {
        self.has_graphics
    }

    pub fn has_scene(&self) -> bool {
        self.current.is_some()
    }

    pub fn has_pending_scene(&self) -> bool {
        self.pending.is_some()
    }

    pub fn current_scene_name(&self) -> Option<&str> {
        self.current.as_ref().map(|scene| scene.name())
    }

    pub fn screen_size(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }

    //--- Transitions ------------------------------------------------------

    /// Queues `scene` for installation on the next [`Self::do_frame`].
    ///
    /// An earlier request that was never installed is dropped here and
    /// receives no hooks.
    pub fn request_new_scene(&mut self, scene: Box<dyn Scene>) {
        debug!(target: "scene", "Requested scene {}", scene.name());
        if let Some(discarded) = self.pending.replace(scene) {
            warn!(
                target: "scene",
                "Pending scene {} replaced before install, dropping it",
                discarded.name()
            );
        }
    }

    /// Installs a pending scene if any, then renders the current one.
    pub fn do_frame(&mut self, ctx: &mut SceneContext<'_>) {
        if let Some(scene) = self.pending.take() {
            self.install_scene(Some(scene), ctx);
        }
        self.forward(Requires::SceneAndGraphics, ctx, |scene, ctx| scene.do_frame(ctx));
    }

    /// Replaces the current scene.
    ///
    /// Order: kill graphics (if active) → uninstall old → install new →
    /// start graphics (if they were active). `None` leaves no scene.
    pub fn install_scene(&mut self, scene: Option<Box<dyn Scene>>, ctx: &mut SceneContext<'_>) {
        let had_graphics = self.has_graphics;

        if had_graphics {
            self.kill_graphics(ctx);
        }

        if let Some(mut old) = self.current.take() {
            info!(target: "scene", "Uninstalling scene {}", old.name());
            old.on_uninstall(ctx);
            drop(old);
            self.absorb_requests(ctx);
        }

        self.current = scene;

        if let Some(new) = self.current.as_mut() {
            info!(target: "scene", "Installing scene {}", new.name());
            new.set_input_sdk_context(ctx);
            new.on_install(ctx);
            self.absorb_requests(ctx);
        }

        if had_graphics {
            self.start_graphics(ctx);
        }
    }

    //--- Graphics Lifecycle -----------------------------------------------

    /// Graphics objects exist. No-op if already started.
    pub fn start_graphics(&mut self, ctx: &mut SceneContext<'_>) {
        if self.has_graphics {
            debug!(target: "scene", "start_graphics ignored, already started");
            return;
        }
        info!(target: "scene", "Starting graphics");
        self.has_graphics = true;
        self.forward(Requires::Scene, ctx, |scene, ctx| scene.on_start_graphics(ctx));
    }

    /// Graphics objects are going away. No-op if already killed.
    pub fn kill_graphics(&mut self, ctx: &mut SceneContext<'_>) {
        if !self.has_graphics {
            debug!(target: "scene", "kill_graphics ignored, not started");
            return;
        }
        info!(target: "scene", "Killing graphics");
        self.has_graphics = false;
        self.forward(Requires::Scene, ctx, |scene, ctx| scene.on_kill_graphics(ctx));
    }

    /// Records the surface size and notifies the scene if it changed.
    pub fn set_screen_size(&mut self, width: u32, height: u32, ctx: &mut SceneContext<'_>) {
        if (width, height) == (self.screen_width, self.screen_height) {
            return;
        }
        debug!(target: "scene", "Screen size {}x{}", width, height);
        self.screen_width = width;
        self.screen_height = height;
        self.forward(Requires::SceneAndGraphics, ctx, |scene, ctx| {
            scene.on_screen_resized(width, height, ctx)
        });
    }

    //--- Input Forwarding -------------------------------------------------

    pub fn on_pointer_down(&mut self, pointer_id: i32, coords: &PointerCoords, ctx: &mut SceneContext<'_>) {
        self.forward(Requires::SceneAndGraphics, ctx, |scene, ctx| {
            scene.on_pointer_down(pointer_id, coords, ctx)
        });
    }

    pub fn on_pointer_up(&mut self, pointer_id: i32, coords: &PointerCoords, ctx: &mut SceneContext<'_>) {
        self.forward(Requires::SceneAndGraphics, ctx, |scene, ctx| {
            scene.on_pointer_up(pointer_id, coords, ctx)
        });
    }

    pub fn on_pointer_move(&mut self, pointer_id: i32, coords: &PointerCoords, ctx: &mut SceneContext<'_>) {
        self.forward(Requires::SceneAndGraphics, ctx, |scene, ctx| {
            scene.on_pointer_move(pointer_id, coords, ctx)
        });
    }

    /// Forwards a logical key press. Codes outside `0..LogicalKey::COUNT`
    /// are ignored. Escape is followed by a back-key press.
    pub fn on_key_down(&mut self, code: i32, ctx: &mut SceneContext<'_>) {
        let Some(key) = LogicalKey::from_code(code) else {
            trace!(target: "scene", "Ignoring key code {}", code);
            return;
        };
        self.forward(Requires::SceneAndGraphics, ctx, |scene, ctx| {
            scene.on_key_down(key, ctx);
            if key == LogicalKey::Escape {
                scene.on_back_key_pressed(ctx);
            }
        });
    }

    pub fn on_key_up(&mut self, code: i32, ctx: &mut SceneContext<'_>) {
        let Some(key) = LogicalKey::from_code(code) else {
            trace!(target: "scene", "Ignoring key code {}", code);
            return;
        };
        self.forward(Requires::SceneAndGraphics, ctx, |scene, ctx| scene.on_key_up(key, ctx));
    }

    pub fn update_joy(&mut self, x: f32, y: f32, ctx: &mut SceneContext<'_>) {
        self.forward(Requires::SceneAndGraphics, ctx, |scene, ctx| scene.on_joy(x, y, ctx));
    }

    /// Returns `true` if the current scene consumed the back action.
    pub fn on_back_key_pressed(&mut self, ctx: &mut SceneContext<'_>) -> bool {
        self.forward(Requires::SceneAndGraphics, ctx, |scene, ctx| scene.on_back_key_pressed(ctx))
            .unwrap_or(false)
    }

    pub fn on_text_input(&mut self, ctx: &mut SceneContext<'_>) {
        self.forward(Requires::SceneAndGraphics, ctx, |scene, ctx| scene.on_text_input(ctx));
    }

    //--- Lifecycle Forwarding ---------------------------------------------

    pub fn on_pause(&mut self, ctx: &mut SceneContext<'_>) {
        self.forward(Requires::SceneAndGraphics, ctx, |scene, ctx| scene.on_pause(ctx));
    }

    /// Delivered even without graphics.
    pub fn on_resume(&mut self, ctx: &mut SceneContext<'_>) {
        self.forward(Requires::Scene, ctx, |scene, ctx| scene.on_resume(ctx));
    }

    pub fn set_input_sdk_context(&mut self, ctx: &mut SceneContext<'_>) {
        self.forward(Requires::SceneAndGraphics, ctx, |scene, ctx| scene.set_input_sdk_context(ctx));
    }

    /// Kills graphics, uninstalls the current scene and drops any
    /// pending one.
    pub fn shutdown(&mut self, ctx: &mut SceneContext<'_>) {
        self.kill_graphics(ctx);
        self.install_scene(None, ctx);
        // Requests made while uninstalling land in `pending` and die here.
        if let Some(pending) = self.pending.take() {
            debug!(target: "scene", "Dropping pending scene {} on shutdown", pending.name());
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Calls `hook` on the current scene if the guard allows it.
    fn forward<'a, R>(
        &mut self,
        requires: Requires,
        ctx: &mut SceneContext<'a>,
        hook: impl FnOnce(&mut dyn Scene, &mut SceneContext<'a>) -> R,
    ) -> Option<R> {
        if requires == Requires::SceneAndGraphics && !self.has_graphics {
            return None;
        }
        let scene = self.current.as_deref_mut()?;
        let result = hook(scene, ctx);
        self.absorb_requests(ctx);
        Some(result)
    }

    fn absorb_requests(&mut self, ctx: &mut SceneContext<'_>) {
        if let Some(scene) = ctx.take_requested_scene() {
            self.request_new_scene(scene);
        }
    }
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneManager")
            .field("current", &self.current_scene_name())
            .field("pending", &self.pending.as_ref().map(|scene| scene.name()))
            .field("has_graphics", &self.has_graphics)
            .field("screen", &(self.screen_width, self.screen_height))
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
