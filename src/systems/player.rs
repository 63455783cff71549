//! Player controller.
//!
//! The player runs through four systems per tick, in order:
//!
//! - [`player_input`] turns the input state into intentions: direction,
//!   facing, dash, duck, jump, wall jump, shooting and restart.
//! - [`player_ability_timers`] runs the dash, wall-jump lockout, jump grace,
//!   gun cooldown and knockback windows, spawns dash trails and checks the
//!   pitfall line.
//! - [`player_movement`] applies gravity and moves the hitbox one axis at a
//!   time through the level, riding moving platforms and aiming the gun.
//! - [`player_animation_state`] picks the clip from the resulting state and
//!   plays footsteps.
//!
//! A dead player is skipped by all of them; respawn lives in
//! [`lifecycle`](super::lifecycle).

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, info};

use crate::components::animation::{Activity, Animation, Facing};
use crate::components::boxcollider::{BoxCollider, Rect};
use crate::components::effects::DashTrail;
use crate::components::group::Faction;
use crate::components::gun::Gun;
use crate::components::lifecycle::{DeathCause, Lifecycle};
use crate::components::mapposition::MapPosition;
use crate::components::platform::{MovingPlatform, Solid};
use crate::components::player::{Player, wall_hitbox};
use crate::components::sprite::{Blink, Sprite};
use crate::events::audio::Sfx;
use crate::events::input::InputAction;
use crate::events::lifecycle::DeathMessage;
use crate::resources::audio::Audio;
use crate::resources::input::InputState;
use crate::resources::tuning::TuningConfig;
use crate::resources::worldtime::WorldTime;
use crate::systems::collision::{Axis, Obstacle, sweep_player};
use crate::systems::projectile::fire;

/// Walk frames on which the gun bobs down with the stride.
const BOB_FRAMES: [usize; 4] = [1, 2, 5, 6];
const BOB_OFFSET: f32 = 4.0;

/// Translate held actions into player intentions.
pub fn player_input(
    mut commands: Commands,
    input: Res<InputState>,
    tuning: Res<TuningConfig>,
    mut audio: Audio,
    mut deaths: MessageWriter<DeathMessage>,
    mut query: Query<(Entity, &mut Player, &mut Animation, &mut Gun, &mut Lifecycle)>,
) {
    for (entity, mut player, mut anim, mut gun, mut life) in query.iter_mut() {
        if life.is_dead() {
            continue;
        }
        let held = |action| input.held(action);

        player.strafing = held(InputAction::Strafe);
        if player.strafing && player.strafe_facing.is_none() {
            player.strafe_facing = Some(anim.status.facing);
        }

        if !player.movement_disabled {
            let step = if held(InputAction::MoveRight) {
                Some(Facing::Right)
            } else if held(InputAction::MoveLeft) {
                Some(Facing::Left)
            } else {
                None
            };
            match step {
                Some(facing) => {
                    if !player.strafing && !player.can_wall_jump {
                        anim.status.facing = facing;
                        anim.reversed = false;
                    }
                    if player.strafing {
                        anim.reversed = anim.status.facing != facing;
                    }
                    player.direction.x = facing.sign();
                }
                None => {
                    player.direction.x = 0.0;
                    anim.reversed = false;
                }
            }

            if held(InputAction::Dash) && player.can_jump && player.dash_released {
                if player.direction.x == 0.0 {
                    player.direction.x = anim.status.facing.sign();
                }
                audio.play(Sfx::Dash);
                player.start_dash();
                player.dash_released = false;
                debug!("dash toward {}", player.direction.x);
            }
        }

        player.ducking = player.can_jump && !player.movement_disabled && held(InputAction::Duck);
        if player.ducking {
            anim.status.activity = Activity::Duck;
        }

        if !player.is_knocked_back() {
            if held(InputAction::Jump) && player.can_jump && player.jump_released {
                player.can_jump = false;
                player.vertical_speed = -tuning.player.jump_speed;
                player.cancel_dash();
                player.movement_disabled = false;
                player.jump_released = false;
                audio.play(Sfx::Jump);
            }
            if held(InputAction::Jump) && player.can_wall_jump && player.jump_released {
                player.can_wall_jump = false;
                player.direction.x = player.wall_jump_direction;
                player.wall_jump_lockout.start();
                player.cancel_dash();
                player.movement_disabled = true;
                player.vertical_speed = -tuning.player.wall_jump_speed;
                player.jump_released = false;
                audio.play(Sfx::Jump);
                debug!("wall jump toward {}", player.wall_jump_direction);
            }
            if held(InputAction::Shoot) && gun.ready {
                fire(&mut commands, &mut audio, &tuning, entity, Faction::Player, &mut gun);
            }
        }

        if !held(InputAction::Jump) && (player.can_jump || player.can_wall_jump) {
            player.jump_released = true;
        }
        if !held(InputAction::Dash) && !player.is_dashing() {
            player.dash_released = true;
        }

        if held(InputAction::Restart) && life.kill(DeathCause::Restart) {
            info!("player restarted");
            deaths.write(DeathMessage {
                entity,
                cause: DeathCause::Restart,
            });
        }

        if !player.strafing {
            player.strafe_facing = None;
        }
    }
}

/// Run the player's ability windows, spawn dash trails and check the pitfall.
#[allow(clippy::type_complexity)]
pub fn player_ability_timers(
    mut commands: Commands,
    time: Res<WorldTime>,
    tuning: Res<TuningConfig>,
    mut audio: Audio,
    mut deaths: MessageWriter<DeathMessage>,
    mut query: Query<(
        Entity,
        &mut Player,
        &mut Lifecycle,
        &mut Gun,
        &mut Sprite,
        &BoxCollider,
        &MapPosition,
    )>,
) {
    let dt = time.delta_ms();
    for (entity, mut player, mut life, mut gun, mut sprite, collider, pos) in query.iter_mut() {
        if life.is_dead() {
            continue;
        }
        life.vulnerable = true;

        if player.can_wall_jump {
            audio.play_once(Sfx::Slide);
        } else {
            audio.stop(Sfx::Slide);
        }

        if player.dash.active {
            player.movement_disabled = true;
            if player.dash.expired() {
                player.cancel_dash();
                player.movement_disabled = false;
                debug!("dash ended");
            } else {
                if player.dash_invincibility.within() {
                    life.vulnerable = false;
                }
                player.dash.advance(dt);
                player.dash_invincibility.advance(dt);
            }
        }

        if player.horizontal_speed == tuning.player.dash_speed {
            if player.trail_spawn.expired() {
                let mut ghost = sprite.clone();
                ghost.alpha = tuning.effects.trail_alpha;
                ghost.blink = None;
                let trail = commands
                    .spawn((
                        DashTrail { owner: entity },
                        MapPosition { pos: pos.pos },
                        BoxCollider::visual(collider.rect),
                        ghost,
                    ))
                    .id();
                if let Some(oldest) = player.trails.push(trail) {
                    commands.entity(oldest).try_despawn();
                }
                player.trail_spawn.reset();
            }
            player.trail_spawn.advance(dt);
        } else if !player.trails.is_empty() {
            for trail in player.trails.drain() {
                commands.entity(trail).try_despawn();
            }
        }

        player.can_wall_jump = false;

        if player.wall_jump_lockout.active {
            player.movement_disabled = true;
            player.wall_jump_lockout.advance(dt);
            if player.wall_jump_lockout.expired() {
                player.wall_jump_lockout.stop();
                player.movement_disabled = false;
            }
        }

        player.jump_grace.advance(dt);
        if player.jump_grace.expired() {
            player.can_jump = false;
        }

        if !gun.ready {
            gun.cooldown.advance(dt);
            if gun.cooldown.expired() {
                gun.reload();
            }
        }

        if player.knockback_invincibility.active {
            life.vulnerable = false;
            if player.knockback_invincibility.expired() {
                player.knockback_invincibility.active = false;
            }
            player.knockback_invincibility.advance(dt);
        }

        sprite.blink = if life.vulnerable {
            None
        } else {
            Some(Blink::phase(time.elapsed_ms()))
        };

        if player.knockback.active {
            if player.knockback.expired() {
                player.knockback.active = false;
                player.movement_disabled = false;
            }
            player.strafing = true;
            player.knockback.advance(dt);
        }

        if collider.rect.bottom() > player.death_y && life.kill(DeathCause::Pitfall) {
            info!("player fell out of the level");
            deaths.write(DeathMessage {
                entity,
                cause: DeathCause::Pitfall,
            });
        }
    }
}

/// Gravity, swept movement through the level and gun aiming.
#[allow(clippy::type_complexity)]
pub fn player_movement(
    time: Res<WorldTime>,
    tuning: Res<TuningConfig>,
    mut audio: Audio,
    mut deaths: MessageWriter<DeathMessage>,
    mut players: Query<(
        Entity,
        &mut Player,
        &mut BoxCollider,
        &mut MapPosition,
        &mut Animation,
        &mut Gun,
        &mut Lifecycle,
    )>,
    solids: Query<(Entity, &BoxCollider, Option<&MovingPlatform>), (With<Solid>, Without<Player>)>,
) {
    let t = &tuning.player;
    let dt = time.delta;
    let obstacles: Vec<Obstacle> = solids
        .iter()
        .map(|(entity, collider, _)| Obstacle::new(entity, collider))
        .collect();

    for (entity, mut player, mut collider, mut pos, mut anim, mut gun, mut life) in players.iter_mut() {
        if life.is_dead() {
            continue;
        }

        if player.ducking {
            player.direction.x = 0.0;
        }
        if player.can_jump {
            player.horizontal_speed = t.speed;
        }
        if player.is_dashing() {
            player.horizontal_speed = t.dash_speed;
        }

        player.vertical_speed += t.gravity * dt;
        if player.vertical_speed > t.terminal_velocity {
            player.vertical_speed = t.terminal_velocity;
            if life.alive {
                audio.play_once(Sfx::FallScream);
            }
        }
        player.direction.y = if player.vertical_speed == 0.0 {
            0.0
        } else {
            player.vertical_speed.signum()
        };

        let Some(mut hitbox) = collider.hitbox else {
            continue;
        };

        // horizontal pass
        pos.pos.x += player.direction.x * player.horizontal_speed * dt;
        let x = pos.pos.x.round();
        collider.prev_hitbox.set_center_x(hitbox.center_x());
        collider.rect.set_center_x(x);
        hitbox.set_center_x(x);
        collider.hitbox = Some(hitbox);
        player.wall_hitbox.set_center_x(x);

        let mut facing = anim.status.facing;
        let collider = &mut *collider;
        sweep_player(
            Axis::Horizontal,
            &mut player,
            collider,
            &mut pos.pos,
            &mut facing,
            life.alive,
            &obstacles,
            t,
        );
        anim.status.facing = facing;

        // vertical pass
        pos.pos.y += player.vertical_speed * dt;

        let probe = Rect::from_midtop(
            collider.rect.midbottom(),
            collider.hitbox.map_or(0.0, |h| h.w),
            t.floor_probe,
        );
        if player.direction.y > 0.0 {
            let floor = solids
                .iter()
                .find(|(_, c, platform)| platform.is_some() && c.rect.overlaps(&probe));
            if let Some((floor, _, _)) = floor {
                player.moving_floor = Some(floor);
                player.can_jump = true;
            }
        }
        if let Some(floor) = player.moving_floor
            && let Ok((_, floor_collider, Some(platform))) = solids.get(floor)
            && platform.descending()
            && player.direction.y > 0.0
        {
            player.vertical_speed = 0.0;
            collider.rect.set_bottom(floor_collider.rect.top());
            pos.pos.y = collider.rect.center_y();
            player.can_jump = true;
        }

        let y = pos.pos.y.round();
        let Some(mut hitbox) = collider.hitbox else {
            continue;
        };
        collider.rect.set_center_y(y);
        collider.prev_hitbox.set_center_y(hitbox.center_y());
        hitbox.set_center_y(y);
        collider.hitbox = Some(hitbox);
        player.wall_hitbox = wall_hitbox(collider.rect, hitbox.center());

        let contact = sweep_player(
            Axis::Vertical,
            &mut player,
            collider,
            &mut pos.pos,
            &mut facing,
            life.alive,
            &obstacles,
            t,
        );
        anim.status.facing = facing;
        player.moving_floor = None;

        if contact.landed {
            audio.play(Sfx::Land);
        }
        if contact.fatal_landing && life.kill(DeathCause::FallDamage) {
            info!("player hit the ground at terminal velocity");
            deaths.write(DeathMessage {
                entity,
                cause: DeathCause::FallDamage,
            });
        }

        let mut offset_y = if player.ducking {
            gun.duck_offset_y.unwrap_or(gun.offset.y)
        } else {
            gun.offset.y
        };
        if !player.can_jump {
            offset_y = gun.jump_offset_y.unwrap_or(offset_y);
        }
        if anim.status.activity == Activity::Walk && BOB_FRAMES.contains(&anim.frame()) {
            offset_y += BOB_OFFSET;
        }
        gun.aim(collider.rect.center(), anim.status.facing, offset_y);
    }
}

/// Choose the clip for this tick and play footsteps.
pub fn player_animation_state(
    mut audio: Audio,
    mut query: Query<(&Player, &mut Animation, &Gun, &Lifecycle)>,
) {
    for (player, mut anim, gun, life) in query.iter_mut() {
        if life.is_dead() {
            continue;
        }
        if player.strafing
            && !player.can_wall_jump
            && let Some(facing) = player.strafe_facing
        {
            anim.status.facing = facing;
        }

        if player.direction.x == 0.0 {
            anim.status.activity = Activity::Idle;
            if !gun.ready {
                anim.frame_index = 0.0;
            }
        } else {
            anim.status.activity = Activity::Walk;
        }
        if !player.can_jump || player.is_knocked_back() || player.is_dashing() {
            anim.status.activity = Activity::Jump;
        }
        if player.ducking {
            anim.status.activity = Activity::Duck;
        }

        if anim.status.activity == Activity::Walk {
            match anim.frame() {
                1 => audio.play_once(Sfx::Step1),
                5 => audio.play_once(Sfx::Step2),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::animation::StatusKey;
    use crate::components::player::movement_hitbox;
    use crate::resources::audio::init_audio_messages;
    use crate::systems::audio::update_bevy_audio_cmds;

    fn world_with_player(rect: Rect) -> (World, Entity) {
        let mut world = World::new();
        let tuning = TuningConfig::default();
        world.insert_resource(WorldTime::default());
        world.insert_resource(InputState::default());
        init_audio_messages(&mut world);
        world.init_resource::<Messages<DeathMessage>>();
        let t = &tuning.player;
        let player = world
            .spawn((
                Player::new(t, 10_000.0, rect),
                BoxCollider::with_hitbox(rect, movement_hitbox(rect)),
                MapPosition { pos: rect.center() },
                Animation::new("player", StatusKey::default(), t.animation_speed),
                Gun::new(Vec2::new(t.bullet_x, t.bullet_y), t.bullet_speed, t.bullet_delay, 10)
                    .with_stance_offsets(t.bullet_y_duck, t.bullet_y_jump),
                Lifecycle::new(t.max_health, rect.center(), t.max_blood).with_hit_invincibility(),
                Sprite::new(rect.w, rect.h),
                Faction::Player,
            ))
            .id();
        world.insert_resource(tuning);
        (world, player)
    }

    fn set_time(world: &mut World, dt: f32) {
        let mut time = world.resource_mut::<WorldTime>();
        time.delta = dt;
        time.elapsed += dt;
    }

    #[test]
    fn jump_needs_release_between_presses() {
        let (mut world, player) = world_with_player(Rect::new(0.0, 0.0, 40.0, 64.0));
        world.entity_mut(player).get_mut::<Player>().unwrap().can_jump = true;
        let mut schedule = Schedule::default();
        schedule.add_systems((player_input, update_bevy_audio_cmds).chain());

        world.resource_mut::<InputState>().jump.set(true);
        schedule.run(&mut world);
        let p = world.get::<Player>(player).unwrap();
        assert_eq!(p.vertical_speed, -900.0);
        assert!(!p.jump_released);

        // still held and grounded again: no second jump
        world.entity_mut(player).get_mut::<Player>().unwrap().can_jump = true;
        world.entity_mut(player).get_mut::<Player>().unwrap().vertical_speed = 0.0;
        schedule.run(&mut world);
        assert_eq!(world.get::<Player>(player).unwrap().vertical_speed, 0.0);

        // released, then pressed again
        world.resource_mut::<InputState>().jump.set(false);
        schedule.run(&mut world);
        world.resource_mut::<InputState>().jump.set(true);
        schedule.run(&mut world);
        assert_eq!(world.get::<Player>(player).unwrap().vertical_speed, -900.0);
    }

    #[test]
    fn dash_defaults_to_facing_and_is_invincible_early() {
        let (mut world, player) = world_with_player(Rect::new(0.0, 0.0, 40.0, 64.0));
        world.entity_mut(player).get_mut::<Player>().unwrap().can_jump = true;
        world.entity_mut(player).get_mut::<Animation>().unwrap().status.facing = Facing::Left;
        let mut schedule = Schedule::default();
        schedule.add_systems((player_input, player_ability_timers, update_bevy_audio_cmds).chain());

        world.resource_mut::<InputState>().dash.set(true);
        set_time(&mut world, 0.05);
        schedule.run(&mut world);
        let p = world.get::<Player>(player).unwrap();
        assert!(p.is_dashing());
        assert_eq!(p.direction.x, -1.0);
        assert!(!world.get::<Lifecycle>(player).unwrap().vulnerable);

        // past the 100 ms window but still dashing
        set_time(&mut world, 0.06);
        schedule.run(&mut world);
        schedule.run(&mut world);
        assert!(world.get::<Player>(player).unwrap().is_dashing());
        assert!(world.get::<Lifecycle>(player).unwrap().vulnerable);
    }

    #[test]
    fn dash_speed_applies_in_the_air() {
        let (mut world, player) = world_with_player(Rect::new(0.0, 0.0, 40.0, 64.0));
        {
            let mut p = world.get_mut::<Player>(player).unwrap();
            p.can_jump = false;
            p.horizontal_speed = 400.0;
            p.direction.x = 1.0;
            p.start_dash();
        }
        let mut schedule = Schedule::default();
        schedule.add_systems((player_movement, update_bevy_audio_cmds).chain());
        set_time(&mut world, 1.0 / 60.0);
        schedule.run(&mut world);
        assert_eq!(world.get::<Player>(player).unwrap().horizontal_speed, 1200.0);

        // once the dash is over, airborne speed is left alone until landing
        world.get_mut::<Player>(player).unwrap().cancel_dash();
        schedule.run(&mut world);
        assert_eq!(world.get::<Player>(player).unwrap().horizontal_speed, 1200.0);
    }

    #[test]
    fn falling_below_death_line_is_a_pitfall() {
        let (mut world, player) = world_with_player(Rect::new(0.0, 0.0, 40.0, 64.0));
        world.entity_mut(player).get_mut::<Player>().unwrap().death_y = 50.0;
        let mut schedule = Schedule::default();
        schedule.add_systems((player_ability_timers, update_bevy_audio_cmds).chain());
        set_time(&mut world, 0.016);
        schedule.run(&mut world);

        let life = world.get::<Lifecycle>(player).unwrap();
        assert!(life.is_dead());
        assert_eq!(life.death_cause, Some(DeathCause::Pitfall));
        let deaths = world.resource::<Messages<DeathMessage>>();
        let mut cursor = deaths.get_cursor();
        let causes: Vec<_> = cursor.read(deaths).map(|m| m.cause).collect();
        assert_eq!(causes, vec![DeathCause::Pitfall]);
    }

    #[test]
    fn gravity_lands_player_on_floor() {
        let (mut world, player) = world_with_player(Rect::new(100.0, 0.0, 40.0, 64.0));
        world.spawn((Solid, BoxCollider::solid(Rect::new(0.0, 100.0, 400.0, 32.0))));
        let mut schedule = Schedule::default();
        schedule.add_systems((player_movement, update_bevy_audio_cmds).chain());
        for _ in 0..60 {
            set_time(&mut world, 1.0 / 60.0);
            schedule.run(&mut world);
        }
        let collider = world.get::<BoxCollider>(player).unwrap();
        assert_eq!(collider.hitbox.unwrap().bottom(), 100.0);
        let p = world.get::<Player>(player).unwrap();
        assert!(p.can_jump);
        assert_eq!(p.vertical_speed, 0.0);
    }

    #[test]
    fn restart_kills_once() {
        let (mut world, player) = world_with_player(Rect::new(0.0, 0.0, 40.0, 64.0));
        let mut schedule = Schedule::default();
        schedule.add_systems((player_input, update_bevy_audio_cmds).chain());
        world.resource_mut::<InputState>().restart.set(true);
        schedule.run(&mut world);
        schedule.run(&mut world);
        let life = world.get::<Lifecycle>(player).unwrap();
        assert_eq!(life.death_cause, Some(DeathCause::Restart));
        let deaths = world.resource::<Messages<DeathMessage>>();
        assert_eq!(deaths.len(), 1);
    }
}
