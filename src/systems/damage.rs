//! Reactions to accepted hits and deaths.
//!
//! Health is already updated by the time these run (see
//! [`projectile`](super::projectile::projectile)). The player is knocked back
//! on every hit, the killing one included; enemies only flash. Every death,
//! whatever its cause, leaves blood behind.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, info};

use crate::components::animation::{Activity, Animation};
use crate::components::boxcollider::{BoxCollider, Rect};
use crate::components::effects::{BloodParticle, BloodSplat};
use crate::components::enemy::Enemy;
use crate::components::lifecycle::{DeathCause, Lifecycle};
use crate::components::mapposition::MapPosition;
use crate::components::player::Player;
use crate::components::pool::BoundedPool;
use crate::components::sprite::Sprite;
use crate::components::timer::TimedState;
use crate::events::audio::Sfx;
use crate::events::lifecycle::{DeathMessage, HurtMessage};
use crate::resources::audio::Audio;
use crate::resources::levelstatus::LevelStatus;
use crate::resources::rng::SimRng;
use crate::resources::tuning::{EffectsTuning, PlayerTuning, TuningConfig};

/// Base edge of the blood splat decal in pixels.
const SPLAT_SIZE: f32 = 8.0;

/// Knock the player away from where it faces and open the invincibility
/// window.
pub fn knock_back(player: &mut Player, anim: &Animation, t: &PlayerTuning) {
    player.knockback.start();
    player.direction.x = -anim.status.facing.sign();
    player.movement_disabled = true;
    player.cancel_dash();
    player.horizontal_speed = t.speed;
    player.strafing = true;
    player.knockback_invincibility.start();
    player.vertical_speed = -t.knockback_speed;
}

pub fn player_damage_reaction(
    tuning: Res<TuningConfig>,
    mut audio: Audio,
    mut hurt: MessageReader<HurtMessage>,
    mut died: MessageReader<DeathMessage>,
    mut players: Query<(&mut Player, &Animation, &Lifecycle)>,
) {
    for msg in hurt.read() {
        if let Ok((mut player, anim, life)) = players.get_mut(msg.entity) {
            knock_back(&mut player, anim, &tuning.player);
            audio.play(Sfx::Pain);
            debug!("player hit, {} health left", life.health);
        }
    }
    for msg in died.read() {
        if msg.cause != DeathCause::Damage {
            continue;
        }
        if let Ok((mut player, anim, _)) = players.get_mut(msg.entity) {
            knock_back(&mut player, anim, &tuning.player);
        }
    }
}

pub fn enemy_damage_reaction(
    tuning: Res<TuningConfig>,
    mut audio: Audio,
    mut hurt: MessageReader<HurtMessage>,
    mut died: MessageReader<DeathMessage>,
    mut enemies: Query<(&mut Enemy, &mut Animation, &mut Sprite), Without<Player>>,
) {
    for msg in hurt.read() {
        if let Ok((mut enemy, _, _)) = enemies.get_mut(msg.entity) {
            audio.play(Sfx::Hit);
            enemy.blink.start();
        }
    }
    for msg in died.read() {
        if let Ok((mut enemy, mut anim, mut sprite)) = enemies.get_mut(msg.entity) {
            audio.play(Sfx::Hit);
            enemy.blink.stop();
            sprite.blink = None;
            anim.status.activity = Activity::Dead;
            anim.speed *= tuning.enemy.death_animation_factor;
            anim.set_frame(0.0);
            info!("enemy {:?} down", msg.entity);
        }
    }
}

/// Spawn a splat centred on `at` into `pool`, despawning the evicted one.
fn spawn_splat(commands: &mut Commands, rng: &mut SimRng, fx: &EffectsTuning, pool: &mut BoundedPool, at: Vec2) {
    let scale = rng.range_f32(fx.splat_min_scale, fx.splat_max_scale);
    let angle = rng.range_ms(0.0, 360.0);
    let size = SPLAT_SIZE * scale;
    let splat = commands
        .spawn((
            BloodSplat { angle, scale },
            MapPosition { pos: at },
            BoxCollider::visual(Rect::from_center(at, size, size)),
            Sprite::new(size, size),
        ))
        .id();
    if let Some(oldest) = pool.push(splat) {
        commands.entity(oldest).try_despawn();
    }
}

/// Spawn one gib flying out of `at`.
fn spawn_gib(commands: &mut Commands, rng: &mut SimRng, fx: &EffectsTuning, pool: &mut BoundedPool, at: Vec2) {
    let velocity = rng.range_ms(fx.particle_min_velocity, fx.particle_max_velocity);
    let scale = rng.range_f32(fx.particle_min_scale, fx.particle_max_scale);
    let size = fx.particle_size * scale;
    let mut life = TimedState::new(fx.particle_lifetime);
    life.start();
    let gib = commands
        .spawn((
            BloodParticle {
                velocity_x: velocity,
                velocity_y: velocity,
                direction: Vec2::new(rng.range_f32(-1.0, 1.0), -1.0),
                gravity: fx.particle_gravity,
                life,
                scale,
                settled: false,
            },
            MapPosition { pos: at },
            BoxCollider::visual(Rect::from_center(at, size, size)),
            Sprite::new(size, size),
        ))
        .id();
    if let Some(oldest) = pool.push(gib) {
        commands.entity(oldest).try_despawn();
    }
}

/// Blood for every death; the player's body also disappears in a gib burst.
#[allow(clippy::type_complexity)]
pub fn death_effects(
    mut commands: Commands,
    tuning: Res<TuningConfig>,
    mut rng: ResMut<SimRng>,
    mut audio: Audio,
    mut status: ResMut<LevelStatus>,
    mut died: MessageReader<DeathMessage>,
    mut query: Query<(&mut Lifecycle, &BoxCollider, Option<&mut Player>, Option<&mut Sprite>)>,
) {
    let fx = &tuning.effects;
    for msg in died.read() {
        let Ok((mut life, collider, player, sprite)) = query.get_mut(msg.entity) else {
            continue;
        };
        let center = collider.rect.center();
        for _ in 0..fx.splats_per_death {
            spawn_splat(&mut commands, &mut rng, fx, &mut life.effects, center);
        }

        let Some(mut player) = player else {
            continue;
        };
        if let Some(mut sprite) = sprite {
            sprite.alpha = 0.0;
            sprite.blink = None;
        }
        audio.stop(Sfx::FallScream);
        audio.play(match msg.cause {
            DeathCause::Pitfall => Sfx::PitfallScream,
            _ => Sfx::Gib,
        });
        player.can_wall_jump = false;
        player.can_jump = false;
        for trail in player.trails.drain() {
            commands.entity(trail).try_despawn();
        }
        let mut gibs = std::mem::replace(&mut player.gibs, BoundedPool::new(0));
        for _ in 0..tuning.player.gib_count {
            spawn_gib(&mut commands, &mut rng, fx, &mut gibs, center);
        }
        player.gibs = gibs;
        status.player_deaths += 1;
        info!("player died ({:?})", msg.cause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::animation::StatusKey;
    use crate::resources::audio::init_audio_messages;

    fn setup() -> World {
        let mut world = World::new();
        world.insert_resource(TuningConfig::default());
        world.insert_resource(SimRng::with_seed(3));
        world.insert_resource(LevelStatus::default());
        init_audio_messages(&mut world);
        world.init_resource::<Messages<HurtMessage>>();
        world.init_resource::<Messages<DeathMessage>>();
        world
    }

    #[test]
    fn enemy_death_keeps_two_splats_and_plays_dead_clip() {
        let mut world = setup();
        let rect = Rect::new(0.0, 0.0, 48.0, 64.0);
        let enemy = world
            .spawn((
                Enemy::new(1000.0, 200.0),
                Animation::new("enemy", StatusKey::default(), 8.0),
                Sprite::new(48.0, 64.0),
                BoxCollider::solid(rect),
                Lifecycle::new(3, rect.center(), 2),
            ))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems((enemy_damage_reaction, death_effects).chain());

        for _ in 0..2 {
            world.write_message(DeathMessage {
                entity: enemy,
                cause: DeathCause::Damage,
            });
            schedule.run(&mut world);
        }
        let life = world.get::<Lifecycle>(enemy).unwrap();
        assert_eq!(life.effects.len(), 2);
        let mut splats = world.query::<&BloodSplat>();
        assert_eq!(splats.iter(&world).count(), 2);
        let anim = world.get::<Animation>(enemy).unwrap();
        assert_eq!(anim.status.activity, Activity::Dead);
    }

    #[test]
    fn player_hit_knocks_back_away_from_facing() {
        let mut world = setup();
        let rect = Rect::new(0.0, 0.0, 40.0, 64.0);
        let tuning = TuningConfig::default();
        let player = world
            .spawn((
                Player::new(&tuning.player, 1000.0, rect),
                Animation::new("player", StatusKey::default(), 10.0),
                Lifecycle::new(5, rect.center(), 400),
            ))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems(player_damage_reaction);
        world.write_message(HurtMessage { entity: player });
        schedule.run(&mut world);

        let p = world.get::<Player>(player).unwrap();
        assert!(p.is_knocked_back());
        assert!(p.knockback_invincibility.active);
        assert_eq!(p.direction.x, -1.0);
        assert_eq!(p.vertical_speed, -tuning.player.knockback_speed);
    }

    #[test]
    fn player_death_bursts_into_capped_gibs() {
        let mut world = setup();
        let rect = Rect::new(0.0, 0.0, 40.0, 64.0);
        let tuning = TuningConfig::default();
        let player = world
            .spawn((
                Player::new(&tuning.player, 1000.0, rect),
                BoxCollider::with_hitbox(rect, rect),
                Sprite::new(40.0, 64.0),
                Lifecycle::new(5, rect.center(), 400),
            ))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems(death_effects);
        for _ in 0..5 {
            world.write_message(DeathMessage {
                entity: player,
                cause: DeathCause::Restart,
            });
            schedule.run(&mut world);
        }
        let p = world.get::<Player>(player).unwrap();
        assert_eq!(p.gibs.len(), 400);
        let mut gibs = world.query::<&BloodParticle>();
        assert_eq!(gibs.iter(&world).count(), 400);
        assert!(world.get::<Sprite>(player).unwrap().hidden());
        assert_eq!(world.resource::<LevelStatus>().player_deaths, 5);
    }
}
