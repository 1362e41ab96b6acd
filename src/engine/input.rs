//=========================================================================
// Engine Input
//=========================================================================
//
// Routes raw platform input to the scene manager.
//
//   PointerDown/Up/Move ──► PointerCoords (surface bounds) ──► on_pointer_*
//   KeyDown/KeyUp       ──► LogicalKey code ──► on_key_down / on_key_up
//   Axis                ──► controller + axis bookkeeping, dead zone ──► update_joy
//   TextInput           ──► on_text_input
//   BackPressed         ──► on_back_key_pressed (quit if unconsumed)
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use crate::core::display::Display;
use crate::core::input::{InputEvent, LogicalKey, PointerCoords, AXIS_X, AXIS_Y};
use crate::core::platform_bridge::EventSource;
use crate::core::scene::SceneState;
use super::Engine;

impl<E: EventSource, D: Display> Engine<E, D> {
    /// Delivers one input event. Returns `true` if a scene received it.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        trace!(target: "engine::input", "{:?}", event);
        let deliverable = self.scenes.state() == SceneState::SceneActiveWithGraphics;

        match event {
            InputEvent::PointerDown { pointer_id, x, y } => {
                let coords = self.pointer_coords(x, y);
                self.with_scenes(|scenes, ctx| scenes.on_pointer_down(pointer_id, &coords, ctx));
                deliverable
            }

            InputEvent::PointerUp { pointer_id, x, y } => {
                let coords = self.pointer_coords(x, y);
                self.with_scenes(|scenes, ctx| scenes.on_pointer_up(pointer_id, &coords, ctx));
                deliverable
            }

            InputEvent::PointerMove { pointer_id, x, y } => {
                let coords = self.pointer_coords(x, y);
                self.with_scenes(|scenes, ctx| scenes.on_pointer_move(pointer_id, &coords, ctx));
                deliverable
            }

            InputEvent::KeyDown { key } => match LogicalKey::from_key_code(key) {
                Some(logical) => {
                    self.with_scenes(|scenes, ctx| scenes.on_key_down(logical.code(), ctx));
                    deliverable
                }
                None => false,
            },

            InputEvent::KeyUp { key } => match LogicalKey::from_key_code(key) {
                Some(logical) => {
                    self.with_scenes(|scenes, ctx| scenes.on_key_up(logical.code(), ctx));
                    deliverable
                }
                None => false,
            },

            InputEvent::Axis { controller, axis, value } => {
                self.handle_axis(controller, axis, value);
                deliverable
            }

            InputEvent::TextInput => {
                self.with_scenes(|scenes, ctx| scenes.on_text_input(ctx));
                deliverable
            }

            InputEvent::BackPressed => {
                let consumed = self.with_scenes(|scenes, ctx| scenes.on_back_key_pressed(ctx));
                if !consumed && self.config.exit_on_unhandled_back {
                    info!(target: "engine::input", "Back not consumed, quitting");
                    self.quitting = true;
                }
                consumed
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn pointer_coords(&self, x: f32, y: f32) -> PointerCoords {
        PointerCoords::on_screen(x, y, self.surface_width, self.surface_height)
    }

    fn handle_axis(&mut self, controller: i32, axis: u32, value: f32) {
        if controller != self.active_game_controller_index {
            info!(target: "engine::input", "Active game controller is now {}", controller);
            self.active_game_controller_index = controller;
            self.active_axis_bitfield = 0;
        }
        self.check_for_new_axis(axis);

        let value = self.apply_dead_zone(value);
        match axis {
            AXIS_X => self.joy_x = value,
            AXIS_Y => self.joy_y = value,
            _ => return,
        }

        let (x, y) = (self.joy_x, self.joy_y);
        self.with_scenes(|scenes, ctx| scenes.update_joy(x, y, ctx));
    }

    fn check_for_new_axis(&mut self, axis: u32) {
        let Some(bit) = 1u64.checked_shl(axis) else {
            debug!(target: "engine::input", "Axis {} out of tracking range", axis);
            return;
        };
        if self.active_axis_bitfield & bit == 0 {
            info!(target: "engine::input", "New axis {} on controller {}", axis, self.active_game_controller_index);
            self.active_axis_bitfield |= bit;
        }
    }

    fn apply_dead_zone(&self, value: f32) -> f32 {
        if value.abs() < self.config.joystick_dead_zone {
            0.0
        } else {
            value.clamp(-1.0, 1.0)
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::core::display::VirtualDisplay;
    use crate::core::input::KeyCode;
    use crate::core::platform_bridge::{AppCommand, ChannelEventSource, NativeWindow, WindowHandle};
    use crate::core::scene::{Scene, SceneContext};
    use crate::core::services::MemoryProgressStore;
    use crate::engine::{Engine, EngineBuilder};
    use super::*;

    type Log = Rc<RefCell<Vec<String>>>;

    struct InputRecorder {
        log: Log,
        consume_back: bool,
    }

    impl Scene for InputRecorder {
        fn on_pointer_down(&mut self, id: i32, coords: &PointerCoords, _ctx: &mut SceneContext<'_>) {
            self.log.borrow_mut().push(format!("down {} {}x{}", id, coords.max_x, coords.max_y));
        }
        fn on_key_down(&mut self, key: LogicalKey, _ctx: &mut SceneContext<'_>) {
            self.log.borrow_mut().push(format!("key {:?}", key));
        }
        fn on_joy(&mut self, x: f32, y: f32, _ctx: &mut SceneContext<'_>) {
            self.log.borrow_mut().push(format!("joy {} {}", x, y));
        }
        fn on_back_key_pressed(&mut self, _ctx: &mut SceneContext<'_>) -> bool {
            self.log.borrow_mut().push("back".into());
            self.consume_back
        }
    }

    fn running_engine(consume_back: bool) -> (Engine<ChannelEventSource, VirtualDisplay>, Log) {
        let (_sender, events) = ChannelEventSource::channel();
        let mut engine = EngineBuilder::new()
            .with_local_store(MemoryProgressStore::new())
            .build(events, VirtualDisplay::new())
            .unwrap();

        let log = Log::default();
        engine.request_new_scene(Box::new(InputRecorder { log: log.clone(), consume_back }));
        engine.handle_command(AppCommand::InitWindow(NativeWindow {
            handle: WindowHandle(1),
            width: 800,
            height: 600,
        }));
        // Installs the pending scene.
        assert!(engine.prepare_to_render());
        engine.do_frame();
        (engine, log)
    }

    #[test]
    fn pointer_coords_use_surface_bounds() {
        let (mut engine, log) = running_engine(false);
        assert!(engine.handle_input(InputEvent::PointerDown { pointer_id: 2, x: 5.0, y: 6.0 }));
        assert_eq!(*log.borrow(), vec!["down 2 800x600"]);
    }

    #[test]
    fn physical_keys_map_to_logical_keys() {
        let (mut engine, log) = running_engine(false);
        assert!(engine.handle_input(InputEvent::KeyDown { key: KeyCode::ArrowLeft }));
        assert!(!engine.handle_input(InputEvent::KeyDown { key: KeyCode::KeyQ }), "Unmapped key");
        assert_eq!(*log.borrow(), vec!["key Left"]);
    }

    #[test]
    fn axis_applies_dead_zone_and_tracks_controller() {
        let (mut engine, log) = running_engine(false);

        engine.handle_input(InputEvent::Axis { controller: 1, axis: AXIS_X, value: 0.05 });
        engine.handle_input(InputEvent::Axis { controller: 1, axis: AXIS_Y, value: -0.5 });
        engine.handle_input(InputEvent::Axis { controller: 1, axis: 17, value: 1.0 });

        assert_eq!(*log.borrow(), vec!["joy 0 0", "joy 0 -0.5"]);
        assert_eq!(engine.active_game_controller_index(), 1);
        assert_eq!(engine.active_axis_bitfield(), (1 << AXIS_X) | (1 << AXIS_Y) | (1 << 17));
    }

    #[test]
    fn controller_switch_resets_axis_tracking() {
        let (mut engine, _log) = running_engine(false);
        engine.handle_input(InputEvent::Axis { controller: 0, axis: AXIS_Y, value: 0.5 });
        engine.handle_input(InputEvent::Axis { controller: 3, axis: AXIS_X, value: 0.5 });
        assert_eq!(engine.active_axis_bitfield(), 1 << AXIS_X);
    }

    #[test]
    fn unconsumed_back_quits() {
        let (mut engine, log) = running_engine(false);
        assert!(!engine.handle_input(InputEvent::BackPressed));
        assert!(engine.is_quitting());
        assert_eq!(*log.borrow(), vec!["back"]);
    }

    #[test]
    fn consumed_back_keeps_running() {
        let (mut engine, _log) = running_engine(true);
        assert!(engine.handle_input(InputEvent::BackPressed));
        assert!(!engine.is_quitting());
    }

    #[test]
    fn input_without_graphics_is_not_delivered() {
        let (mut engine, log) = running_engine(false);
        engine.handle_command(AppCommand::TermWindow);

        assert!(!engine.handle_input(InputEvent::PointerDown { pointer_id: 0, x: 1.0, y: 1.0 }));
        assert!(log.borrow().is_empty());
    }
}
