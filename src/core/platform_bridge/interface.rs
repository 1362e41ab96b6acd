//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-core interface types (events, handles and errors).
//
// Defines the contract between the hosting platform glue and the engine.
// Everything the host tells the engine arrives as a `PlatformEvent`
// pulled through an `EventSource`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::display::DisplayChange;
use crate::core::input::InputEvent;

//=== Window Handles ======================================================

/// Opaque identifier of a platform window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

/// A platform window as seen by the engine: identity plus current size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeWindow {
    pub handle: WindowHandle,
    pub width: u32,
    pub height: u32,
}

//=== PlatformApp =========================================================

/// Host application facts handed to the engine at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformApp {
    /// Platform API level. Zero means the host could not report one.
    pub api_level: u32,

    /// Screen density in dots per inch.
    pub screen_density: u32,
}

impl PlatformApp {
    /// Values reported by the desktop host.
    pub fn desktop() -> Self {
        Self {
            api_level: 34,
            screen_density: 160,
        }
    }
}

impl Default for PlatformApp {
    fn default() -> Self {
        Self::desktop()
    }
}

//=== AppCommand ==========================================================

/// Application lifecycle commands issued by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// A window (surface) is ready for use.
    InitWindow(NativeWindow),

    /// The window is about to be destroyed; release everything bound to it.
    TermWindow,

    GainedFocus,
    LostFocus,

    Start,
    Stop,
    Pause,
    Resume,

    /// Device configuration (orientation, density, locale) changed.
    ConfigChanged,

    /// The platform asks for a saved-state snapshot.
    SaveState,

    LowMemory,

    WindowRedrawNeeded,

    /// The application is being destroyed; leave the game loop.
    Destroy,
}

//=== PlatformEvent =======================================================

/// Everything the host delivers to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    Command(AppCommand),
    Input(InputEvent),
    Display(DisplayChange),
}

impl From<AppCommand> for PlatformEvent {
    fn from(command: AppCommand) -> Self {
        Self::Command(command)
    }
}

impl From<InputEvent> for PlatformEvent {
    fn from(event: InputEvent) -> Self {
        Self::Input(event)
    }
}

impl From<DisplayChange> for PlatformEvent {
    fn from(change: DisplayChange) -> Self {
        Self::Display(change)
    }
}

//=== PlatformError =======================================================

/// Platform glue failures. All of them are host faults.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(String),

    /// Event loop execution error.
    #[error("event loop error: {0}")]
    EventLoopExecution(String),

    /// The platform could not provide a window.
    #[error("window creation failed: {0}")]
    WindowCreation(String),

    /// The event producer went away.
    #[error("platform event source disconnected")]
    Disconnected,
}

//=== EventSource =========================================================

/// Blocking, timeout-driven source of platform events.
///
/// `timeout`:
/// - `None` blocks until the next event arrives
/// - `Some(Duration::ZERO)` never blocks
/// - `Some(d)` waits at most `d`
///
/// Returns `Ok(None)` when the timeout elapses without an event.
pub trait EventSource {
    fn poll_event(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<Option<PlatformEvent>, PlatformError>;
}
