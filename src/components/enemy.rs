use bevy_ecs::prelude::Component;

use crate::components::timer::TimedState;

/// Enemy behaviour state: idle turning or attacking the player.
#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub attacking: bool,
    /// Idle facing flip; the deadline is re-rolled after every turn.
    pub turn: TimedState,
    /// Visual hit flash. Enemies stay vulnerable while it runs.
    pub blink: TimedState,
}

impl Enemy {
    pub fn new(turn_delay_ms: f32, blink_ms: f32) -> Self {
        let mut turn = TimedState::new(turn_delay_ms);
        turn.start();
        Self {
            attacking: false,
            turn,
            blink: TimedState::new(blink_ms),
        }
    }
}
