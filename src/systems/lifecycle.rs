//! Respawn and lifecycle message housekeeping.
//!
//! The player comes back when jump is pressed while dead. Respawn rebuilds
//! the player's state from scratch at its origin, keeping only the blood it
//! left behind, and resets every enemy with it.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;

use crate::components::animation::{Activity, Animation, StatusKey};
use crate::components::boxcollider::BoxCollider;
use crate::components::enemy::Enemy;
use crate::components::gun::Gun;
use crate::components::lifecycle::Lifecycle;
use crate::components::mapposition::MapPosition;
use crate::components::player::{Player, movement_hitbox};
use crate::components::pool::BoundedPool;
use crate::components::sprite::Sprite;
use crate::events::audio::Sfx;
use crate::events::lifecycle::{DeathMessage, HurtMessage};
use crate::resources::audio::Audio;
use crate::resources::input::InputState;
use crate::resources::tuning::TuningConfig;

/// Put a collider back on `center`, keeping its sizes.
fn recenter(collider: &mut BoxCollider, center: Vec2) {
    let center = center.round();
    collider.rect.set_center(center);
    if let Some(mut hitbox) = collider.hitbox {
        hitbox.set_center(center);
        collider.hitbox = Some(hitbox);
        collider.prev_hitbox = hitbox;
    }
}

#[allow(clippy::type_complexity)]
pub fn player_respawn(
    mut commands: Commands,
    input: Res<InputState>,
    tuning: Res<TuningConfig>,
    mut audio: Audio,
    mut players: Query<(
        &mut Player,
        &mut Lifecycle,
        &mut Animation,
        &mut Gun,
        &mut Sprite,
        &mut BoxCollider,
        &mut MapPosition,
    )>,
    mut enemies: Query<
        (
            &mut Enemy,
            &mut Lifecycle,
            &mut Animation,
            &mut Gun,
            &mut Sprite,
            &mut BoxCollider,
            &mut MapPosition,
        ),
        Without<Player>,
    >,
) {
    if !input.jump.active {
        return;
    }
    for (mut player, mut life, mut anim, mut gun, mut sprite, mut collider, mut pos) in
        players.iter_mut()
    {
        if !life.is_dead() {
            continue;
        }

        for (mut enemy, mut enemy_life, mut enemy_anim, mut enemy_gun, mut enemy_sprite, mut enemy_collider, mut enemy_pos) in
            enemies.iter_mut()
        {
            for splat in enemy_life.effects.drain() {
                commands.entity(splat).try_despawn();
            }
            enemy_life.respawn();
            enemy_pos.pos = enemy_life.origin;
            recenter(&mut enemy_collider, enemy_life.origin);
            enemy.attacking = false;
            enemy.blink.stop();
            enemy_anim.status.activity = Activity::Walk;
            enemy_anim.speed = tuning.enemy.animation_speed;
            enemy_anim.reversed = false;
            enemy_anim.set_frame(0.0);
            enemy_gun.reload();
            enemy_sprite.blink = None;
        }

        for sfx in Sfx::PLAYER {
            audio.stop(sfx);
        }

        life.respawn();
        pos.pos = life.origin;
        recenter(&mut collider, life.origin);
        if collider.hitbox.is_some() {
            let hitbox = movement_hitbox(collider.rect);
            collider.hitbox = Some(hitbox);
            collider.prev_hitbox = hitbox;
        }

        let gibs = std::mem::replace(&mut player.gibs, BoundedPool::new(0));
        let death_y = player.death_y;
        *player = Player::new(&tuning.player, death_y, collider.rect);
        player.gibs = gibs;

        let set = anim.set.clone();
        *anim = Animation::new(set, StatusKey::default(), tuning.player.animation_speed);
        gun.reload();
        let offset_y = gun.offset.y;
        gun.aim(collider.rect.center(), anim.status.facing, offset_y);
        sprite.alpha = 1.0;
        sprite.blink = None;

        info!("player respawned at {:?}", life.origin);
    }
}

/// Advance the lifecycle message queues once per tick.
pub fn update_lifecycle_messages(
    mut hurt: ResMut<Messages<HurtMessage>>,
    mut died: ResMut<Messages<DeathMessage>>,
) {
    hurt.update();
    died.update();
}
