//! Player ability state.
//!
//! Everything the player controller needs between ticks lives on the
//! [`Player`] component: velocities, the edge-trigger latches, the named
//! timed states of the ability machine and the effect pools owned by the
//! player. Shared concerns (health, animation, gun, geometry) are separate
//! components on the same entity.

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec2;

use crate::components::animation::Facing;
use crate::components::boxcollider::Rect;
use crate::components::pool::BoundedPool;
use crate::components::timer::TimedState;
use crate::resources::tuning::PlayerTuning;

#[derive(Component, Debug, Clone)]
pub struct Player {
    /// Horizontal intent in {-1, 0, 1}; `y` mirrors the sign of the vertical speed.
    pub direction: Vec2,
    pub horizontal_speed: f32,
    pub vertical_speed: f32,

    pub strafing: bool,
    /// Facing captured when strafing began.
    pub strafe_facing: Option<Facing>,
    pub ducking: bool,
    /// Grounded, or still inside the jump grace period.
    pub can_jump: bool,
    /// Wall-slide eligible this tick.
    pub can_wall_jump: bool,
    pub wall_jump_direction: f32,
    pub movement_disabled: bool,

    pub jump_released: bool,
    pub dash_released: bool,

    /// Active while dashing.
    pub dash: TimedState,
    pub dash_invincibility: TimedState,
    pub wall_jump_lockout: TimedState,
    /// Active while knocked back.
    pub knockback: TimedState,
    pub knockback_invincibility: TimedState,
    pub jump_grace: TimedState,
    pub trail_spawn: TimedState,

    pub wall_hitbox: Rect,
    /// Platform found by the floor probe this tick.
    pub moving_floor: Option<Entity>,
    pub death_y: f32,

    pub trails: BoundedPool,
    pub gibs: BoundedPool,
}

impl Player {
    pub fn new(t: &PlayerTuning, death_y: f32, rect: Rect) -> Self {
        Self {
            direction: Vec2::new(0.0, -1.0),
            horizontal_speed: 0.0,
            vertical_speed: -t.respawn_speed,
            strafing: false,
            strafe_facing: None,
            ducking: false,
            can_jump: false,
            can_wall_jump: false,
            wall_jump_direction: 0.0,
            movement_disabled: false,
            jump_released: true,
            dash_released: true,
            dash: TimedState::new(t.dash_time),
            dash_invincibility: TimedState::new(t.dash_invincibility),
            wall_jump_lockout: TimedState::new(t.wall_jump_lockout),
            knockback: TimedState::new(t.knockback_time),
            knockback_invincibility: TimedState::new(t.invincibility_time),
            jump_grace: TimedState::new(t.jump_grace),
            trail_spawn: TimedState::new(t.trail_period),
            wall_hitbox: wall_hitbox(rect, rect.center()),
            moving_floor: None,
            death_y,
            trails: BoundedPool::new(t.max_trails),
            gibs: BoundedPool::new(t.gib_count * 4),
        }
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.active
    }

    pub fn is_knocked_back(&self) -> bool {
        self.knockback.active
    }

    pub fn start_dash(&mut self) {
        self.dash.start();
        self.dash_invincibility.start();
    }

    pub fn cancel_dash(&mut self) {
        self.dash.stop();
        self.dash_invincibility.stop();
    }
}

/// Movement hitbox: 25% of the visual width, full height, same centre.
pub fn movement_hitbox(rect: Rect) -> Rect {
    rect.inflate(-rect.w * 0.75, 0.0)
}

/// Wall-detection hitbox: 30% width and 25% height of the visual rect, its
/// mid-top 20 px below `hitbox_center`.
pub fn wall_hitbox(rect: Rect, hitbox_center: Vec2) -> Rect {
    let size = rect.inflate(-rect.w * 0.70, -rect.h * 0.75);
    Rect::from_midtop(hitbox_center + Vec2::new(0.0, 20.0), size.w, size.h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hitbox_proportions() {
        let rect = Rect::new(0.0, 0.0, 100.0, 80.0);
        let hb = movement_hitbox(rect);
        assert!((hb.w - 25.0).abs() < 1e-4);
        assert_eq!(hb.h, 80.0);
        assert_eq!(hb.center(), rect.center());
        let wall = wall_hitbox(rect, hb.center());
        assert!((wall.w - 30.0).abs() < 1e-4);
        assert!((wall.h - 20.0).abs() < 1e-4);
        assert_eq!(wall.top(), hb.center_y() + 20.0);
        assert_eq!(wall.center_x(), hb.center_x());
    }

    #[test]
    fn new_player_starts_rising_with_latches_released() {
        let p = Player::new(&PlayerTuning::default(), 1000.0, Rect::new(0.0, 0.0, 40.0, 64.0));
        assert!(p.vertical_speed < 0.0);
        assert!(p.jump_released && p.dash_released);
        assert!(!p.is_dashing());
        assert!(!p.knockback_invincibility.active);
        assert_eq!(p.trails.capacity(), 4);
    }

    #[test]
    fn cancel_dash_stops_both_windows() {
        let mut p = Player::new(&PlayerTuning::default(), 1000.0, Rect::new(0.0, 0.0, 40.0, 64.0));
        p.start_dash();
        assert!(p.is_dashing() && p.dash_invincibility.active);
        p.dash.advance(150.0);
        p.dash_invincibility.advance(150.0);
        assert!(!p.dash_invincibility.within());
        assert!(p.is_dashing());
        p.cancel_dash();
        assert!(!p.is_dashing() && !p.dash_invincibility.active);
        assert_eq!(p.dash.elapsed, 0.0);
    }
}
