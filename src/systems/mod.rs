//! Simulation systems.
//!
//! This module groups all ECS systems that advance one tick of the level.
//! The order they run in is fixed by [`crate::game::build_schedule`].
//!
//! Submodules overview
//! - [`animation`] – advance frame indices and refresh sprites
//! - [`audio`] – bridge with the audio thread (poll/update message queues)
//! - [`collision`] – axis-separated sweep of a mover against solids
//! - [`damage`] – knockback, blink, blood and gibs after hits and deaths
//! - [`effects`] – blood particle physics and muzzle flash tracking
//! - [`enemy`] – idle turning, aggro and firing
//! - [`input`] – fold the host snapshot into [`crate::resources::input::InputState`]
//! - [`levelstatus`] – publish enemy counts and the win flag
//! - [`lifecycle`] – respawn and lifecycle message housekeeping
//! - [`platform`] – moving platforms and their riders
//! - [`player`] – player controller, abilities and movement
//! - [`projectile`] – firing and bullet flight
//! - [`time`] – update simulation time and delta

pub mod animation;
pub mod audio;
pub mod collision;
pub mod damage;
pub mod effects;
pub mod enemy;
pub mod input;
pub mod levelstatus;
pub mod lifecycle;
pub mod platform;
pub mod player;
pub mod projectile;
pub mod time;
