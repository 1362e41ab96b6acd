//=========================================================================
// Tunnel Engine - Library Root
//
// Runtime core of a mobile-style game: the lifecycle state machine that
// owns display and swapchain, the game loop, and the scene manager that
// forwards lifecycle and input to the current scene.
//
// Typical usage:
// ```no_run
// use tunnel_engine::prelude::*;
//
// struct Title;
// impl Scene for Title {}
//
// fn main() -> Result<(), EngineError> {
//     tunnel_engine::run_desktop(EngineBuilder::new(), Box::new(Title))
// }
// ```
//
// Embedders with their own host feed a `ChannelEventSource` (or any
// `EventSource`) and provide a `Display`, then call `Engine::game_loop`.
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod config;
pub mod core;
pub mod error;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the Winit desktop host and is kept private apart
// from its entry points.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use config::EngineConfig;
pub use engine::{Engine, EngineBuilder, NativeEngineSavedState};
pub use error::{AssetError, ConfigError, DisplayError, EngineError, SaveError};
pub use platform::{run_desktop, WinitEventSource};
