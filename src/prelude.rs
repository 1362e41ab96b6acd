//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use tunnel_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::config::EngineConfig;
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::error::{DisplayError, EngineError, SaveError};

// Host bridge
pub use crate::core::display::{Display, VirtualDisplay};
pub use crate::core::platform_bridge::{
    AppCommand, ChannelEventSource, EventSource, NativeWindow, PlatformEvent, WindowHandle,
};

// Input
pub use crate::core::input::{InputEvent, KeyCode, LogicalKey, PointerCoords};

// Scene system
pub use crate::core::scene::{FrameInfo, Scene, SceneContext, SceneManager, SceneState};

// Services
pub use crate::core::services::Services;
