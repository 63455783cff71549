//! Health, death and respawn state shared by the player and enemies.
//!
//! [`Lifecycle`] is the single owner of the alive flag. Health only ever
//! moves down by one per accepted hit and the transition to dead happens
//! exactly once, whether it comes from damage or from [`Lifecycle::kill`].

use bevy_ecs::prelude::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::pool::BoundedPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Damage,
    /// Fell below the level's death line.
    Pitfall,
    /// Landed at terminal velocity.
    FallDamage,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Ignored,
    Hurt,
    Killed,
}

/// Capability to receive a projectile hit.
pub trait Damageable {
    fn take_damage(&mut self) -> DamageOutcome;
}

#[derive(Component, Debug, Clone)]
pub struct Lifecycle {
    pub health: u32,
    pub max_health: u32,
    pub alive: bool,
    pub vulnerable: bool,
    /// Position restored on respawn.
    pub origin: Vec2,
    pub death_cause: Option<DeathCause>,
    /// Blood splats left behind by deaths.
    pub effects: BoundedPool,
    /// Clear `vulnerable` after an accepted hit so later hits in the same tick
    /// are rejected.
    pub hit_grants_invincibility: bool,
}

impl Lifecycle {
    pub fn new(max_health: u32, origin: Vec2, effects_capacity: usize) -> Self {
        Self {
            health: max_health,
            max_health,
            alive: true,
            vulnerable: true,
            origin,
            death_cause: None,
            effects: BoundedPool::new(effects_capacity),
            hit_grants_invincibility: false,
        }
    }

    pub fn with_hit_invincibility(mut self) -> Self {
        self.hit_grants_invincibility = true;
        self
    }

    pub fn is_dead(&self) -> bool {
        !self.alive
    }

    /// Mark dead with `cause`. Returns `false` if already dead.
    pub fn kill(&mut self, cause: DeathCause) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.health = 0;
        self.death_cause = Some(cause);
        true
    }

    /// Restore health and flags. Position and effects are the caller's job.
    pub fn respawn(&mut self) {
        self.alive = true;
        self.vulnerable = true;
        self.health = self.max_health;
        self.death_cause = None;
    }
}

impl Damageable for Lifecycle {
    fn take_damage(&mut self) -> DamageOutcome {
        if !self.alive || !self.vulnerable || self.health == 0 {
            return DamageOutcome::Ignored;
        }
        self.health -= 1;
        if self.hit_grants_invincibility {
            self.vulnerable = false;
        }
        if self.health == 0 {
            self.kill(DeathCause::Damage);
            return DamageOutcome::Killed;
        }
        DamageOutcome::Hurt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_counts_down_and_kills_once() {
        let mut life = Lifecycle::new(2, Vec2::ZERO, 2);
        assert_eq!(life.take_damage(), DamageOutcome::Hurt);
        assert_eq!(life.health, 1);
        assert_eq!(life.take_damage(), DamageOutcome::Killed);
        assert!(life.is_dead());
        assert_eq!(life.death_cause, Some(DeathCause::Damage));
        assert_eq!(life.take_damage(), DamageOutcome::Ignored);
        assert_eq!(life.health, 0);
        assert!(!life.kill(DeathCause::Pitfall));
        assert_eq!(life.death_cause, Some(DeathCause::Damage));
    }

    #[test]
    fn invulnerable_ignores_hits() {
        let mut life = Lifecycle::new(3, Vec2::ZERO, 2);
        life.vulnerable = false;
        assert_eq!(life.take_damage(), DamageOutcome::Ignored);
        assert_eq!(life.health, 3);
    }

    #[test]
    fn hit_invincibility_blocks_second_hit() {
        let mut life = Lifecycle::new(3, Vec2::ZERO, 2).with_hit_invincibility();
        assert_eq!(life.take_damage(), DamageOutcome::Hurt);
        assert_eq!(life.take_damage(), DamageOutcome::Ignored);
        assert_eq!(life.health, 2);
    }

    #[test]
    fn kill_forces_health_to_zero() {
        let mut life = Lifecycle::new(5, Vec2::ZERO, 2);
        assert!(life.kill(DeathCause::Pitfall));
        assert_eq!(life.health, 0);
        life.respawn();
        assert!(life.alive);
        assert_eq!(life.health, 5);
        assert_eq!(life.death_cause, None);
    }
}
