//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the simulated level. Components hold the per-entity state that the systems
//! read and mutate each tick.
//!
//! Submodules overview:
//! - [`animation`] – facing/activity status key and fractional frame playback
//! - [`boxcollider`] – axis-aligned rectangles, visual rect plus movement hitbox
//! - [`effects`] – blood particles, muzzle flashes and dash trails
//! - [`enemy`] – enemy behaviour state (turn timer, aggro, blink)
//! - [`group`] – faction tag used to pick projectile targets
//! - [`gun`] – firing point, cooldown and bullet pool
//! - [`lifecycle`] – health, death cause, origin and owned effects
//! - [`mapposition`] – authoritative continuous position
//! - [`mask`] – per-pixel collision masks and shape overlap
//! - [`platform`] – solids, moving platforms and their turn markers
//! - [`player`] – player ability state and timers
//! - [`pool`] – capacity-limited FIFO of owned entities
//! - [`projectile`] – bullet velocity, shooter and age
//! - [`sprite`] – render-facing frame, alpha and blink state
//! - [`timer`] – accumulator-plus-deadline timed state

pub mod animation;
pub mod boxcollider;
pub mod effects;
pub mod enemy;
pub mod group;
pub mod gun;
pub mod lifecycle;
pub mod mapposition;
pub mod mask;
pub mod platform;
pub mod player;
pub mod pool;
pub mod projectile;
pub mod sprite;
pub mod timer;
