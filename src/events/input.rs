use serde::{Deserialize, Serialize};

/// Logical gameplay actions, independent of any key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Jump,
    Dash,
    Duck,
    Shoot,
    Strafe,
    Restart,
}

impl InputAction {
    pub const ALL: [InputAction; 8] = [
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::Jump,
        InputAction::Dash,
        InputAction::Duck,
        InputAction::Shoot,
        InputAction::Strafe,
        InputAction::Restart,
    ];
}
