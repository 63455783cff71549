//! runngun library.
//!
//! This module exposes the simulation's ECS components, resources, systems
//! and messages for use by the binary, by integration tests and by hosts
//! that render the level themselves.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
