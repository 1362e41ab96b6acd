//=========================================================================
// Saved State
//=========================================================================
//
// Snapshot the host persists across process death (`SaveState` command)
// and hands back through `EngineBuilder::with_saved_state`.
//
//=========================================================================

use serde::{Deserialize, Serialize};

use crate::error::SaveError;

//=== NativeEngineSavedState ==============================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeEngineSavedState {
    pub has_focus: bool,
}

impl NativeEngineSavedState {
    pub fn to_bytes(&self) -> Result<Vec<u8>, SaveError> {
        serde_json::to_vec(self).map_err(|e| SaveError::Corrupt(e.to_string()))
    }

    pub fn from_bytes(blob: &[u8]) -> Result<Self, SaveError> {
        serde_json::from_slice(blob).map_err(|e| SaveError::Corrupt(e.to_string()))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_survives_serialization() {
        let state = NativeEngineSavedState { has_focus: true };
        let restored = NativeEngineSavedState::from_bytes(&state.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn garbage_is_corrupt() {
        assert!(matches!(
            NativeEngineSavedState::from_bytes(b"\x00\x01"),
            Err(SaveError::Corrupt(_))
        ));
    }
}
