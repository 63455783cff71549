//! Damage and death notifications.
//!
//! Health changes are applied where the hit is detected so that later hits
//! in the same tick see the new state. These messages carry the consequences
//! (knockback, blink, sounds, blood) to the reaction systems further down the
//! tick.

use bevy_ecs::prelude::*;

use crate::components::lifecycle::DeathCause;

/// An accepted hit that left the target alive.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HurtMessage {
    pub entity: Entity,
}

/// An entity transitioned from alive to dead.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathMessage {
    pub entity: Entity,
    pub cause: DeathCause,
}
