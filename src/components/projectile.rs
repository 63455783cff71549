use bevy_ecs::prelude::{Component, Entity};
use glam::Vec2;

use crate::components::group::Faction;
use crate::components::timer::TimedState;

/// A bullet in flight.
#[derive(Component, Debug, Clone)]
pub struct Projectile {
    /// Unit vector, horizontal only.
    pub direction: Vec2,
    pub speed: f32,
    /// Faction this bullet can damage.
    pub target: Faction,
    /// Lifetime; the bullet fades once past the deadline.
    pub age: TimedState,
    pub shooter: Entity,
}

impl Projectile {
    pub fn new(direction_x: f32, speed: f32, target: Faction, fade_ms: f32, shooter: Entity) -> Self {
        let mut age = TimedState::new(fade_ms);
        age.start();
        Self {
            direction: Vec2::new(direction_x.signum(), 0.0),
            speed,
            target,
            age,
            shooter,
        }
    }
}
