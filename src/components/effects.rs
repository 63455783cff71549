//! Short-lived visual entities: blood, muzzle flashes and dash trails.
//!
//! None of these take part in gameplay collision. They are spawned by death,
//! firing and dashing, and removed by timeout or by eviction from the pool of
//! the entity that owns them.

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec2;

use crate::components::timer::TimedState;

/// Decal left where an entity died.
#[derive(Component, Debug, Clone, Copy)]
pub struct BloodSplat {
    /// Degrees.
    pub angle: f32,
    pub scale: f32,
}

/// Ballistic gib thrown on player death.
#[derive(Component, Debug, Clone)]
pub struct BloodParticle {
    /// Launch speed for both axes.
    pub velocity_x: f32,
    /// Decays by gravity every tick.
    pub velocity_y: f32,
    /// `x` in [-1, 1], `y` is -1 (upward launch).
    pub direction: Vec2,
    pub gravity: f32,
    pub life: TimedState,
    pub scale: f32,
    /// Stopped by level contact or lifetime; no longer moves by itself.
    pub settled: bool,
}

/// Kinematic attachment to a moving platform.
#[derive(Component, Debug, Clone, Copy)]
pub struct Parented {
    pub platform: Entity,
}

/// Muzzle flash following its shooter's firing point.
#[derive(Component, Debug, Clone, Copy)]
pub struct MuzzleFlash {
    pub owner: Entity,
    pub frame_index: f32,
    pub frames: usize,
    pub speed: f32,
    pub flipped: bool,
}

/// Afterimage spawned while dashing.
#[derive(Component, Debug, Clone, Copy)]
pub struct DashTrail {
    pub owner: Entity,
}
