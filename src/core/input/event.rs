//=========================================================================
// Input Event Types
//
// Defines the internal representation of raw input delivered by the
// platform layer.
//
// This module abstracts away platform-specific input (winit, the Android
// input queue, a game controller library) into a unified, engine-friendly
// format consumed by `Engine::handle_input`.
//
// Event Flow:
// ```text
// Platform Layer (winit / host glue)
//         ↓
//    InputEvent (this module)
//         ↓
//    Engine::handle_input  ── KeyCode → LogicalKey
//         ↓
//    SceneManager forwarders
//         ↓
//    Current Scene
// ```
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical key or controller button identifier.
///
/// Represents the physical key location, not the character produced.
/// Game controller buttons live in the same enum because the engine maps
/// both onto the same small [`LogicalKey`](super::LogicalKey) set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    //--- Controller Buttons -----------------------------------------------

    /// Face buttons (Xbox layout naming).
    ButtonA,
    ButtonB,
    ButtonX,
    ButtonY,

    /// Directional pad.
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,

    /// Fallback for keys not explicitly mapped by the input layer.
    Unidentified,
}

//=== PointerCoords =======================================================

/// Pointer position together with the bounds it was measured in.
///
/// `is_screen` is true when the coordinates are in surface pixels, false
/// when they come from a relative device (trackpad, controller stick).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerCoords {
    pub x: f32,
    pub y: f32,
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub is_screen: bool,
}

impl PointerCoords {
    /// Screen-space coordinates bounded by a `width` x `height` surface.
    pub fn on_screen(x: f32, y: f32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            min_x: 0.0,
            max_x: width as f32,
            min_y: 0.0,
            max_y: height as f32,
            is_screen: true,
        }
    }
}

//=== Axis Indices ========================================================

/// Horizontal stick axis.
pub const AXIS_X: u32 = 0;

/// Vertical stick axis.
pub const AXIS_Y: u32 = 1;

//=== InputEvent ==========================================================

/// Raw input event from the platform layer.
///
/// # Event Types
///
/// - **Pointer***: touch or mouse contacts, identified by `pointer_id`
/// - **KeyDown/KeyUp**: physical keys and controller buttons
/// - **Axis**: one analog axis of a game controller
/// - **TextInput**: the platform text-input state changed
/// - **BackPressed**: the system back action (Android back button)
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { pointer_id: i32, x: f32, y: f32 },
    PointerUp { pointer_id: i32, x: f32, y: f32 },
    PointerMove { pointer_id: i32, x: f32, y: f32 },

    KeyDown { key: KeyCode },
    KeyUp { key: KeyCode },

    /// Analog axis motion. `axis` is a small index (0 = X, 1 = Y, ...).
    Axis { controller: i32, axis: u32, value: f32 },

    TextInput,

    BackPressed,
}

impl InputEvent {
    /// Returns `true` for events that carry continuous values.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::PointerMove { .. } | Self::Axis { .. })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
