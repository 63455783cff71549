//! Per-tick input resources.
//!
//! The host pushes an [`InputSnapshot`] (the set of actions held this tick)
//! before stepping the simulation. The input system folds it into
//! [`InputState`]. Edge triggering is left to the controllers, which keep
//! their own release latches.

use bevy_ecs::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::events::input::InputAction;

/// Actions held down during one tick.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub pressed: FxHashSet<InputAction>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, action: InputAction) -> Self {
        self.pressed.insert(action);
        self
    }

    pub fn from_actions(actions: impl IntoIterator<Item = InputAction>) -> Self {
        Self {
            pressed: actions.into_iter().collect(),
        }
    }

    pub fn is_pressed(&self, action: InputAction) -> bool {
        self.pressed.contains(&action)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolState {
    /// Held this tick.
    pub active: bool,
}

impl BoolState {
    pub fn set(&mut self, held: bool) {
        self.active = held;
    }
}

/// Resource capturing the per-tick state of every gameplay action.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    pub move_left: BoolState,
    pub move_right: BoolState,
    pub jump: BoolState,
    pub dash: BoolState,
    pub duck: BoolState,
    pub shoot: BoolState,
    pub strafe: BoolState,
    pub restart: BoolState,
}

impl InputState {
    pub fn get(&self, action: InputAction) -> &BoolState {
        match action {
            InputAction::MoveLeft => &self.move_left,
            InputAction::MoveRight => &self.move_right,
            InputAction::Jump => &self.jump,
            InputAction::Dash => &self.dash,
            InputAction::Duck => &self.duck,
            InputAction::Shoot => &self.shoot,
            InputAction::Strafe => &self.strafe,
            InputAction::Restart => &self.restart,
        }
    }

    pub fn get_mut(&mut self, action: InputAction) -> &mut BoolState {
        match action {
            InputAction::MoveLeft => &mut self.move_left,
            InputAction::MoveRight => &mut self.move_right,
            InputAction::Jump => &mut self.jump,
            InputAction::Dash => &mut self.dash,
            InputAction::Duck => &mut self.duck,
            InputAction::Shoot => &mut self.shoot,
            InputAction::Strafe => &mut self.strafe,
            InputAction::Restart => &mut self.restart,
        }
    }

    pub fn held(&self, action: InputAction) -> bool {
        self.get(action).active
    }
}
