//=========================================================================
// Input Types
//
// Raw platform input (`InputEvent`, `KeyCode`, `PointerCoords`) and the
// application-level `LogicalKey` set that scenes consume.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod logical_key;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, PointerCoords, AXIS_X, AXIS_Y};
pub use logical_key::LogicalKey;
