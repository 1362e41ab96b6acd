//=========================================================================
// Scene Context
//=========================================================================
//
// Everything a scene hook may touch, lent for the duration of one call.
//
//   SceneContext<'a>
//     ├─ services: &'a mut Services   (assets, textures, tuning, ...)
//     ├─ frame: FrameInfo             (first frame flag, delta, size)
//     ├─ requested_scene              (absorbed by SceneManager)
//     └─ quit_requested               (read back by the Engine)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::time::Duration;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::config::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH};
use crate::core::services::{InputContextId, Services};
use super::Scene;

//=== FrameInfo ===========================================================

/// Timing and surface information for the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// First frame since the swapchain was (re)created. `delta` is zero.
    pub first_frame: bool,
    pub delta: Duration,
    pub width: u32,
    pub height: u32,
}

impl Default for FrameInfo {
    fn default() -> Self {
        Self {
            first_frame: false,
            delta: Duration::ZERO,
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
        }
    }
}

//=== SceneContext ========================================================

pub struct SceneContext<'a> {
    services: &'a mut Services,
    frame: FrameInfo,
    requested_scene: Option<Box<dyn Scene>>,
    quit_requested: bool,
}

impl<'a> SceneContext<'a> {
    pub fn new(services: &'a mut Services, frame: FrameInfo) -> Self {
        Self {
            services,
            frame,
            requested_scene: None,
            quit_requested: false,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn services(&self) -> &Services {
        &*self.services
    }

    pub fn services_mut(&mut self) -> &mut Services {
        &mut *self.services
    }

    pub fn frame(&self) -> FrameInfo {
        self.frame
    }

    //--- Requests ---------------------------------------------------------

    /// Asks for `scene` to replace the current one on the next frame.
    ///
    /// A second request before the manager picks it up drops the first.
    pub fn request_new_scene(&mut self, scene: Box<dyn Scene>) {
        debug!(target: "scene", "Scene {} requested from hook", scene.name());
        if let Some(dropped) = self.requested_scene.replace(scene) {
            warn!(target: "scene", "Discarding requested scene {}", dropped.name());
        }
    }

    /// Asks the engine to leave its game loop.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn set_input_context(&mut self, context: InputContextId) {
        self.services.set_input_context(context);
    }

    //--- Crate Internals --------------------------------------------------

    pub(crate) fn take_requested_scene(&mut self) -> Option<Box<dyn Scene>> {
        self.requested_scene.take()
    }
}

impl fmt::Debug for SceneContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneContext")
            .field("frame", &self.frame)
            .field(
                "requested_scene",
                &self.requested_scene.as_ref().map(|scene| scene.name()),
            )
            .field("quit_requested", &self.quit_requested)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
