//! Swept, axis-separated collision resolution.
//!
//! Movement is integrated one axis at a time and resolved against level
//! geometry after each axis. The side of a contact is decided by comparing
//! the current hitboxes and the hitboxes from the previous tick: a mover is
//! only pushed out of a face it was outside of one tick earlier. This keeps
//! fast movers from popping through thin geometry and keeps an entity that
//! already overlaps something from being shoved sideways.
//!
//! [`resolve_axis`] is the pure rectangle rule. [`sweep_player`] applies it
//! to the player together with the landing, head-bump and wall-slide side
//! effects.

use bevy_ecs::prelude::Entity;
use glam::Vec2;
use smallvec::SmallVec;

use crate::components::animation::Facing;
use crate::components::boxcollider::{BoxCollider, Rect};
use crate::components::player::{Player, wall_hitbox};
use crate::resources::tuning::PlayerTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Face of the obstacle the mover ran into, named by the mover's direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionSide {
    Right,
    Left,
    Down,
    Up,
}

/// Snapshot of a piece of level geometry for one resolve pass.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub entity: Entity,
    pub rect: Rect,
    pub hitbox: Option<Rect>,
    pub prev_hitbox: Rect,
}

impl Obstacle {
    pub fn new(entity: Entity, collider: &BoxCollider) -> Self {
        Self {
            entity,
            rect: collider.rect,
            hitbox: collider.hitbox,
            prev_hitbox: collider.prev_hitbox,
        }
    }
}

/// Push `hitbox` out of `other` along `axis`, if the previous-tick hitboxes
/// show it came from that side. Returns the side that was resolved.
pub fn resolve_axis(
    axis: Axis,
    hitbox: &mut Rect,
    prev: &Rect,
    other: &Rect,
    other_prev: &Rect,
) -> Option<CollisionSide> {
    match axis {
        Axis::Horizontal => {
            if hitbox.right() >= other.left() && prev.right() <= other_prev.left() {
                hitbox.set_right(other.left());
                Some(CollisionSide::Right)
            } else if hitbox.left() <= other.right() && prev.left() >= other_prev.right() {
                hitbox.set_left(other.right());
                Some(CollisionSide::Left)
            } else {
                None
            }
        }
        Axis::Vertical => {
            if hitbox.bottom() >= other.top() && prev.bottom() <= other_prev.top() {
                hitbox.set_bottom(other.top());
                Some(CollisionSide::Down)
            } else if hitbox.top() <= other.bottom() && prev.top() >= other_prev.bottom() {
                hitbox.set_top(other.bottom());
                Some(CollisionSide::Up)
            } else {
                None
            }
        }
    }
}

/// What a player sweep ran into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    /// Grounded went false -> true while alive.
    pub landed: bool,
    /// Landed at or above terminal velocity.
    pub fatal_landing: bool,
}

/// Resolve the player against `obstacles` on one axis.
///
/// Candidates are pre-filtered by visual-rect overlap once, before any
/// correction. After every candidate whose hitbox overlaps, the visual rect,
/// wall hitbox and position are re-derived from the corrected hitbox. The
/// horizontal pass also checks wall-slide eligibility.
#[allow(clippy::too_many_arguments)]
pub fn sweep_player(
    axis: Axis,
    player: &mut Player,
    collider: &mut BoxCollider,
    pos: &mut Vec2,
    facing: &mut Facing,
    alive: bool,
    obstacles: &[Obstacle],
    t: &PlayerTuning,
) -> Contact {
    let mut contact = Contact::default();
    if player.direction == Vec2::ZERO {
        return contact;
    }
    let Some(mut hitbox) = collider.hitbox else {
        return contact;
    };
    let candidates: SmallVec<[&Obstacle; 8]> = obstacles
        .iter()
        .filter(|o| o.rect.overlaps(&collider.rect))
        .collect();

    for obstacle in candidates {
        let Some(other) = obstacle.hitbox else {
            continue;
        };
        if other.overlaps(&hitbox) {
            match resolve_axis(axis, &mut hitbox, &collider.prev_hitbox, &other, &obstacle.prev_hitbox) {
                Some(CollisionSide::Down) => {
                    if player.vertical_speed >= t.terminal_velocity {
                        contact.fatal_landing = true;
                    }
                    player.vertical_speed = 0.0;
                    if !player.can_jump && alive && !contact.fatal_landing {
                        contact.landed = true;
                    }
                    player.can_jump = true;
                    player.jump_grace.reset();
                }
                Some(CollisionSide::Up) => {
                    player.vertical_speed = 0.0;
                }
                _ => {}
            }
            collider.rect.set_center(hitbox.center());
            player.wall_hitbox = wall_hitbox(collider.rect, hitbox.center());
            *pos = hitbox.center();
        }

        if axis == Axis::Horizontal
            && !player.movement_disabled
            && !player.can_jump
            && other.overlaps(&player.wall_hitbox)
        {
            let toward_right = player.direction.x > 0.0;
            let toward_left =
                player.direction.x < 0.0 && obstacle.rect.overlaps(&player.wall_hitbox);
            if toward_right || toward_left {
                player.can_wall_jump = true;
                player.wall_jump_direction = if toward_right { -1.0 } else { 1.0 };
                if player.vertical_speed > t.wall_slide_speed {
                    player.vertical_speed = t.wall_slide_speed;
                }
                // face away from the wall
                *facing = if toward_right { Facing::Left } else { Facing::Right };
            }
        }
    }
    collider.hitbox = Some(hitbox);
    contact
}
