//=========================================================================
// Scene System
//=========================================================================
//
// A scene is one unit of application state (menu, level, loading
// screen). Exactly one scene is current at a time.
//
// Architecture:
//   SceneManager
//     ├─ current: Option<Box<dyn Scene>>
//     ├─ pending: Option<Box<dyn Scene>>   (installed on next do_frame)
//     └─ has_graphics
//
// Flow:
//   Engine ──(SceneContext)──► SceneManager ──guarded forward──► Scene
//
// Scenes never see the manager. Transitions requested from a hook go
// through `SceneContext::request_new_scene` and are deferred like any
// other request, so installation can never re-enter itself.
//
//=========================================================================

//=== Module Declarations =================================================

mod context;
mod scene_manager;

//=== Public API ==========================================================

pub use context::{FrameInfo, SceneContext};
pub use scene_manager::{SceneManager, SceneState};

//=== Internal Dependencies ===============================================

use crate::core::input::{LogicalKey, PointerCoords};

//=== Scene Trait =========================================================

/// Lifecycle and input hooks of an application scene.
///
/// Every hook has an empty default, so a scene implements only what it
/// needs. Hooks are called by [`SceneManager`] only:
///
/// - `on_install` / `on_uninstall` bracket the time the scene is current,
///   exactly once each.
/// - `on_start_graphics` / `on_kill_graphics` may alternate any number
///   of times in between (surface lost and recreated).
/// - `do_frame` and input hooks run only while graphics are valid.
///   `on_resume` is the exception and runs without graphics.
///
/// Hooks have no error channel. A scene handles its own failures.
///
/// # Minimal Implementation
///
/// ```rust
/// # use tunnel_engine::prelude::*;
/// struct TitleScreen;
///
/// impl Scene for TitleScreen {
///     fn do_frame(&mut self, ctx: &mut SceneContext<'_>) {
///         let _first = ctx.frame().first_frame;
///     }
/// }
/// ```
pub trait Scene {
    /// Called once when the scene becomes current.
    fn on_install(&mut self, _ctx: &mut SceneContext<'_>) {}

    /// Called once when the scene stops being current, right before it
    /// is dropped.
    fn on_uninstall(&mut self, _ctx: &mut SceneContext<'_>) {}

    /// Graphics objects exist; create GPU-side resources.
    fn on_start_graphics(&mut self, _ctx: &mut SceneContext<'_>) {}

    /// Graphics objects are about to disappear; release GPU-side resources.
    fn on_kill_graphics(&mut self, _ctx: &mut SceneContext<'_>) {}

    /// Per-frame update and render. Must not block.
    fn do_frame(&mut self, _ctx: &mut SceneContext<'_>) {}

    //--- Input ------------------------------------------------------------

    fn on_pointer_down(&mut self, _pointer_id: i32, _coords: &PointerCoords, _ctx: &mut SceneContext<'_>) {}

    fn on_pointer_up(&mut self, _pointer_id: i32, _coords: &PointerCoords, _ctx: &mut SceneContext<'_>) {}

    fn on_pointer_move(&mut self, _pointer_id: i32, _coords: &PointerCoords, _ctx: &mut SceneContext<'_>) {}

    fn on_key_down(&mut self, _key: LogicalKey, _ctx: &mut SceneContext<'_>) {}

    fn on_key_up(&mut self, _key: LogicalKey, _ctx: &mut SceneContext<'_>) {}

    /// Joystick position, dead zone already applied.
    fn on_joy(&mut self, _x: f32, _y: f32, _ctx: &mut SceneContext<'_>) {}

    /// Back action. Returns `true` if the scene consumed it.
    fn on_back_key_pressed(&mut self, _ctx: &mut SceneContext<'_>) -> bool {
        false
    }

    fn on_text_input(&mut self, _ctx: &mut SceneContext<'_>) {}

    //--- Lifecycle --------------------------------------------------------

    fn on_pause(&mut self, _ctx: &mut SceneContext<'_>) {}

    fn on_resume(&mut self, _ctx: &mut SceneContext<'_>) {}

    fn on_screen_resized(&mut self, _width: u32, _height: u32, _ctx: &mut SceneContext<'_>) {}

    /// Selects the Input SDK context this scene wants active.
    fn set_input_sdk_context(&mut self, _ctx: &mut SceneContext<'_>) {}

    /// Name used in log messages.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
