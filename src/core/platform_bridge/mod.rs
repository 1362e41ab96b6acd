//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the platform layer (winit, Android glue, test harnesses) with
// the engine.
//
// This module defines the contract between platform implementations and
// core logic, enabling platform backends to be swapped without changing
// core code.
//
// Components:
// - `interface`: Event types, handles and error definitions (the contract)
// - `channel_source`: Channel-backed `EventSource` for embedders and tests
//
//=========================================================================

//=== Module Declarations =================================================

mod channel_source;
mod interface;

//=== Public API ==========================================================

pub use channel_source::ChannelEventSource;
pub use interface::{
    AppCommand, EventSource, NativeWindow, PlatformApp, PlatformError, PlatformEvent,
    WindowHandle,
};
