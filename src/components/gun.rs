//! Firing state shared by every shooter.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::animation::Facing;
use crate::components::pool::BoundedPool;
use crate::components::timer::TimedState;

#[derive(Component, Debug, Clone)]
pub struct Gun {
    pub ready: bool,
    pub cooldown: TimedState,
    /// Muzzle offset from the rect centre when facing right.
    pub offset: Vec2,
    pub duck_offset_y: Option<f32>,
    pub jump_offset_y: Option<f32>,
    pub direction_x: f32,
    /// World-space spawn point of the next bullet.
    pub firing_point: Vec2,
    pub bullet_speed: f32,
    /// In-flight bullets, oldest first.
    pub bullets: BoundedPool,
}

impl Gun {
    pub fn new(offset: Vec2, bullet_speed: f32, delay_ms: f32, capacity: usize) -> Self {
        Self {
            ready: true,
            cooldown: TimedState::new(delay_ms),
            offset,
            duck_offset_y: None,
            jump_offset_y: None,
            direction_x: 1.0,
            firing_point: offset,
            bullet_speed,
            bullets: BoundedPool::new(capacity),
        }
    }

    pub fn with_stance_offsets(mut self, duck_y: f32, jump_y: f32) -> Self {
        self.duck_offset_y = Some(duck_y);
        self.jump_offset_y = Some(jump_y);
        self
    }

    /// Recompute the firing point for a shooter centred at `center`.
    pub fn aim(&mut self, center: Vec2, facing: Facing, offset_y: f32) {
        self.direction_x = facing.sign();
        self.firing_point = center + Vec2::new(self.offset.x * self.direction_x, offset_y);
    }

    /// Consume the ready flag and restart the cooldown. `false` if not ready.
    pub fn trigger(&mut self) -> bool {
        if !self.ready {
            return false;
        }
        self.ready = false;
        self.cooldown.start();
        true
    }

    /// Reset to a loaded gun with no bullets tracked.
    pub fn reload(&mut self) {
        self.ready = true;
        self.cooldown.stop();
    }
}
