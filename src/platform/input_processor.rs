//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit input into engine InputEvents.
//
// Architecture:
//   Winit Events → InputProcessor → InputEvent (engine type) → EventBuffer
//
// The left mouse button behaves like a touch contact with pointer id 0:
// cursor motion is only reported while it is held. Touch contacts use
// ids starting at 1. The browser-back key is the desktop stand-in for
// the system back action. Key repeats and unmapped keys are filtered
// (returns None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, TouchPhase},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode};

//=== Constants ===========================================================

/// Pointer id of the mouse.
pub(crate) const MOUSE_POINTER_ID: i32 = 0;

//=== InputProcessor ======================================================

/// Converts Winit events to engine InputEvents, tracking the cursor.
#[derive(Debug, Default)]
pub(crate) struct InputProcessor {
    cursor: (f32, f32),
    mouse_down: bool,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self::default()
    }

    //--- Event Processing -------------------------------------------------

    /// Converts a Winit KeyEvent (filters repeats and unmapped keys).
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<InputEvent> {
        if key_event.repeat {
            return None;
        }
        match key_event.physical_key {
            PhysicalKey::Code(code) => self.process_key_code(code, key_event.state),
            _ => None,
        }
    }

    /// Left button presses and releases become pointer contacts.
    pub(crate) fn process_mouse_button(
        &mut self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> Option<InputEvent> {
        if button != WinitMouseButton::Left {
            return None;
        }
        let (x, y) = self.cursor;
        match state {
            ElementState::Pressed => {
                self.mouse_down = true;
                Some(InputEvent::PointerDown { pointer_id: MOUSE_POINTER_ID, x, y })
            }
            ElementState::Released => {
                self.mouse_down = false;
                Some(InputEvent::PointerUp { pointer_id: MOUSE_POINTER_ID, x, y })
            }
        }
    }

    /// Records the cursor; reports a move only while the button is held.
    pub(crate) fn process_cursor_moved(&mut self, x: f32, y: f32) -> Option<InputEvent> {
        self.cursor = (x, y);
        self.mouse_down
            .then_some(InputEvent::PointerMove { pointer_id: MOUSE_POINTER_ID, x, y })
    }

    pub(crate) fn process_touch(&self, id: u64, phase: TouchPhase, x: f32, y: f32) -> InputEvent {
        let pointer_id = touch_pointer_id(id);
        match phase {
            TouchPhase::Started => InputEvent::PointerDown { pointer_id, x, y },
            TouchPhase::Moved => InputEvent::PointerMove { pointer_id, x, y },
            TouchPhase::Ended | TouchPhase::Cancelled => InputEvent::PointerUp { pointer_id, x, y },
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn process_key_code(&self, code: WinitKeyCode, state: ElementState) -> Option<InputEvent> {
        if code == WinitKeyCode::BrowserBack {
            return (state == ElementState::Pressed).then_some(InputEvent::BackPressed);
        }

        let key = KeyCode::from(code);
        if matches!(key, KeyCode::Unidentified) {
            return None;
        }

        Some(match state {
            ElementState::Pressed => InputEvent::KeyDown { key },
            ElementState::Released => InputEvent::KeyUp { key },
        })
    }
}

/// Touch ids start at 1 so they never collide with the mouse.
fn touch_pointer_id(id: u64) -> i32 {
    let wrapped = id % (i32::MAX as u64);
    wrapped as i32 + 1
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit physical key codes to engine key codes.
///
/// Maps A-Z, 0-9, arrows, and common special keys. Unmapped keys (F13-F24,
/// numpad, media keys) return `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter | NumpadEnter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,

            //--- Unmapped (return Unidentified) -------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
