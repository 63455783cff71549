//! Enemy behaviour.
//!
//! An idle enemy turns around at random intervals. Once the player comes
//! within the aggro radius on the side it faces, it locks on: it faces the
//! player every tick, holds its aiming frame and fires whenever the gun is
//! ready, until the player leaves the radius or dies.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::animation::{Animation, Facing};
use crate::components::boxcollider::{BoxCollider, Rect};
use crate::components::enemy::Enemy;
use crate::components::group::Faction;
use crate::components::gun::Gun;
use crate::components::lifecycle::Lifecycle;
use crate::components::mapposition::MapPosition;
use crate::components::player::Player;
use crate::components::sprite::{Blink, Sprite};
use crate::resources::audio::Audio;
use crate::resources::rng::SimRng;
use crate::resources::tuning::{EnemyTuning, TuningConfig};
use crate::resources::worldtime::WorldTime;
use crate::systems::projectile::fire;

/// Whether a player at `target` is on the side `facing` looks at and inside
/// the vertical sight band around `rect`.
pub fn in_sight(t: &EnemyTuning, rect: &Rect, pos: Vec2, facing: Facing, target: Vec2) -> bool {
    let in_band = target.y < rect.bottom() + t.sight_band && target.y > rect.top() - t.sight_band;
    let on_side = match facing {
        Facing::Right => target.x >= pos.x,
        Facing::Left => target.x <= pos.x,
    };
    in_band && on_side
}

#[allow(clippy::type_complexity)]
pub fn enemy_ai(
    mut commands: Commands,
    time: Res<WorldTime>,
    tuning: Res<TuningConfig>,
    mut rng: ResMut<SimRng>,
    mut audio: Audio,
    players: Query<(&MapPosition, &Lifecycle), (With<Player>, Without<Enemy>)>,
    mut enemies: Query<
        (
            Entity,
            &mut Enemy,
            &mut Animation,
            &mut Gun,
            &mut Sprite,
            &MapPosition,
            &BoxCollider,
            &Lifecycle,
        ),
        Without<Player>,
    >,
) {
    let t = &tuning.enemy;
    let dt = time.delta_ms();
    let Ok((player_pos, player_life)) = players.single() else {
        return;
    };
    let target = player_pos.pos;

    for (entity, mut enemy, mut anim, mut gun, mut sprite, pos, collider, life) in enemies.iter_mut() {
        if life.is_dead() {
            continue;
        }
        if !player_life.alive {
            enemy.attacking = false;
        }

        if !gun.ready {
            if gun.cooldown.expired() {
                gun.ready = true;
            }
            gun.cooldown.advance(dt);
        }

        if enemy.blink.active {
            if enemy.blink.expired() {
                enemy.blink.active = false;
            }
            enemy.blink.advance(dt);
            sprite.blink = Some(Blink::phase(time.elapsed_ms()));
        } else {
            sprite.blink = None;
        }

        if !enemy.attacking {
            if enemy.turn.elapsed < enemy.turn.deadline {
                enemy.turn.advance(dt);
            } else {
                enemy.turn.reset();
                enemy.turn.deadline = rng.range_ms(t.turn_delay_min, t.turn_delay_max);
                anim.status.facing = anim.status.facing.flipped();
                let offset_y = gun.offset.y;
                gun.aim(collider.rect.center(), anim.status.facing, offset_y);
            }
        }

        let distance = pos.pos.distance(target);
        if !enemy.attacking
            && player_life.alive
            && distance <= t.aggro_distance
            && in_sight(t, &collider.rect, pos.pos, anim.status.facing, target)
        {
            enemy.attacking = true;
            debug!("enemy {:?} spotted the player", entity);
        }

        if enemy.attacking && player_life.alive {
            if distance > t.aggro_distance {
                enemy.attacking = false;
                debug!("enemy {:?} lost the player", entity);
                continue;
            }
            anim.status.facing = Facing::from_sign(target.x - pos.pos.x);
            let offset_y = gun.offset.y;
            gun.aim(collider.rect.center(), anim.status.facing, offset_y);
            anim.set_frame(t.aim_frame);
            if gun.ready {
                fire(&mut commands, &mut audio, &tuning, entity, Faction::Enemy, &mut gun);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::animation::StatusKey;
    use crate::resources::audio::init_audio_messages;

    #[test]
    fn sight_needs_facing_side_and_band() {
        let t = EnemyTuning::default();
        let rect = Rect::new(0.0, 0.0, 48.0, 64.0);
        let pos = rect.center();
        assert!(in_sight(&t, &rect, pos, Facing::Right, Vec2::new(300.0, 40.0)));
        assert!(!in_sight(&t, &rect, pos, Facing::Left, Vec2::new(300.0, 40.0)));
        assert!(!in_sight(&t, &rect, pos, Facing::Right, Vec2::new(300.0, 200.0)));
        assert!(in_sight(&t, &rect, pos, Facing::Right, Vec2::new(300.0, -40.0)));
    }

    fn world_with(enemy_at: Vec2, player_at: Vec2) -> (World, Entity) {
        let mut world = World::new();
        let tuning = TuningConfig::default();
        let mut time = WorldTime::default();
        time.delta = 0.016;
        world.insert_resource(time);
        world.insert_resource(SimRng::with_seed(7));
        init_audio_messages(&mut world);
        world.spawn((
            Player::new(&tuning.player, 1000.0, Rect::from_center(player_at, 40.0, 64.0)),
            MapPosition { pos: player_at },
            Lifecycle::new(5, player_at, 4),
        ));
        let t = &tuning.enemy;
        let rect = Rect::from_center(enemy_at, 48.0, 64.0);
        let enemy = world
            .spawn((
                Enemy::new(4000.0, t.blink_time),
                Animation::new("enemy", StatusKey::default(), t.animation_speed),
                Gun::new(Vec2::new(t.bullet_x, t.bullet_y), t.bullet_speed, t.bullet_delay, 10),
                Sprite::new(48.0, 64.0),
                MapPosition { pos: enemy_at },
                BoxCollider::solid(rect),
                Lifecycle::new(t.max_health, enemy_at, t.max_blood),
                Faction::Enemy,
            ))
            .id();
        world.insert_resource(tuning);
        (world, enemy)
    }

    #[test]
    fn aggro_only_inside_radius() {
        let (mut world, enemy) = world_with(Vec2::new(0.0, 100.0), Vec2::new(801.0, 100.0));
        let mut schedule = Schedule::default();
        schedule.add_systems(enemy_ai);
        schedule.run(&mut world);
        assert!(!world.get::<Enemy>(enemy).unwrap().attacking);

        let (mut world, enemy) = world_with(Vec2::new(0.0, 100.0), Vec2::new(800.0, 100.0));
        let mut schedule = Schedule::default();
        schedule.add_systems(enemy_ai);
        schedule.run(&mut world);
        assert!(world.get::<Enemy>(enemy).unwrap().attacking);
        assert!(!world.get::<Gun>(enemy).unwrap().ready);
    }

    #[test]
    fn loses_interest_when_player_dies() {
        let (mut world, enemy) = world_with(Vec2::new(0.0, 100.0), Vec2::new(300.0, 100.0));
        let mut schedule = Schedule::default();
        schedule.add_systems(enemy_ai);
        schedule.run(&mut world);
        assert!(world.get::<Enemy>(enemy).unwrap().attacking);

        let mut q = world.query_filtered::<&mut Lifecycle, With<Player>>();
        q.single_mut(&mut world).unwrap().alive = false;
        schedule.run(&mut world);
        assert!(!world.get::<Enemy>(enemy).unwrap().attacking);
    }
}
