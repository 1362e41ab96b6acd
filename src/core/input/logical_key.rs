//=========================================================================
// Logical Keys
//=========================================================================
//
// Application-level key set, decoupled from physical keys.
//
// Keyboard keys and controller buttons collapse onto six logical keys.
// Scenes only ever see `LogicalKey`; the SceneManager still range-checks
// raw codes because hosts may forward integer codes directly.
//
//   Arrows / D-pad       → Up, Down, Left, Right
//   Enter / Space / A    → Enter
//   Escape / Backspace / B / Y → Escape
//
//=========================================================================

use super::event::KeyCode;

//=== LogicalKey ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
    /// Also synthesizes a back-key press when delivered to a scene.
    Escape,
}

impl LogicalKey {
    /// Number of logical keys. Valid codes are `0..COUNT`.
    pub const COUNT: i32 = 6;

    const ALL: [Self; 6] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Enter,
        Self::Escape,
    ];

    /// Integer code of this key.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Decodes an integer code. Out-of-range codes yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    /// Maps a physical key to its logical key, if any.
    pub fn from_key_code(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::ArrowUp | KeyCode::DpadUp | KeyCode::KeyW => Some(Self::Up),
            KeyCode::ArrowDown | KeyCode::DpadDown | KeyCode::KeyS => Some(Self::Down),
            KeyCode::ArrowLeft | KeyCode::DpadLeft | KeyCode::KeyA => Some(Self::Left),
            KeyCode::ArrowRight | KeyCode::DpadRight | KeyCode::KeyD => Some(Self::Right),
            KeyCode::Enter | KeyCode::Space | KeyCode::ButtonA => Some(Self::Enter),
            KeyCode::Escape | KeyCode::Backspace | KeyCode::ButtonB | KeyCode::ButtonY => {
                Some(Self::Escape)
            }
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_dense_and_round_trip() {
        for code in 0..LogicalKey::COUNT {
            let key = LogicalKey::from_code(code).expect("code in range");
            assert_eq!(key.code(), code);
        }
    }

    #[test]
    fn out_of_range_codes_are_rejected() {
        assert_eq!(LogicalKey::from_code(-1), None);
        assert_eq!(LogicalKey::from_code(LogicalKey::COUNT), None);
        assert_eq!(LogicalKey::from_code(i32::MAX), None);
    }

    #[test]
    fn controller_buttons_share_keyboard_mapping() {
        assert_eq!(LogicalKey::from_key_code(KeyCode::ButtonA), Some(LogicalKey::Enter));
        assert_eq!(LogicalKey::from_key_code(KeyCode::ButtonB), Some(LogicalKey::Escape));
        assert_eq!(LogicalKey::from_key_code(KeyCode::DpadLeft), Some(LogicalKey::Left));
        assert_eq!(LogicalKey::from_key_code(KeyCode::Escape), Some(LogicalKey::Escape));
    }

    #[test]
    fn unrelated_keys_have_no_mapping() {
        assert_eq!(LogicalKey::from_key_code(KeyCode::KeyQ), None);
        assert_eq!(LogicalKey::from_key_code(KeyCode::Unidentified), None);
    }
}
