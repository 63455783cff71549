//! Blood particles and muzzle flashes.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::boxcollider::BoxCollider;
use crate::components::effects::{BloodParticle, MuzzleFlash, Parented};
use crate::components::gun::Gun;
use crate::components::mapposition::MapPosition;
use crate::components::mask::Shape;
use crate::components::platform::{MovingPlatform, Solid};
use crate::components::sprite::Sprite;
use crate::resources::worldtime::WorldTime;

/// Fly loose particles until they hit the level or run out of time. A
/// particle landing on a moving platform is parented to it.
#[allow(clippy::type_complexity)]
pub fn blood_particle(
    mut commands: Commands,
    time: Res<WorldTime>,
    mut particles: Query<
        (Entity, &mut BloodParticle, &mut MapPosition, &mut BoxCollider, &Sprite),
        Without<Solid>,
    >,
    solids: Query<(Entity, &BoxCollider, Option<&Sprite>, Has<MovingPlatform>), With<Solid>>,
) {
    let dt = time.delta;
    for (entity, mut particle, mut pos, mut collider, sprite) in particles.iter_mut() {
        if particle.settled {
            continue;
        }
        pos.pos.x += particle.direction.x * particle.velocity_x * dt;
        particle.velocity_y -= particle.gravity * dt;
        pos.pos.y += particle.direction.y * particle.velocity_y * dt;
        particle.life.advance(time.delta_ms());
        collider.rect.set_center(pos.pos.round());
        if particle.life.expired() {
            particle.settled = true;
        }

        let shape = Shape::new(collider.rect, sprite.mask.as_deref());
        let contact = solids.iter().find(|(_, solid, solid_sprite, _)| {
            solid.rect.overlaps(&collider.rect)
                && Shape::new(solid.rect, solid_sprite.and_then(|s| s.mask.as_deref())).overlaps(&shape)
        });
        if let Some((solid, _, _, moving)) = contact {
            particle.settled = true;
            if moving {
                commands.entity(entity).insert(Parented { platform: solid });
            }
        }
    }
}

/// Play the flash over the shooter's live firing point and remove it after
/// its last frame.
pub fn muzzle_flash(
    mut commands: Commands,
    time: Res<WorldTime>,
    mut flashes: Query<(Entity, &mut MuzzleFlash, &mut MapPosition, &mut BoxCollider, &mut Sprite)>,
    guns: Query<&Gun, Without<MuzzleFlash>>,
) {
    for (entity, mut flash, mut pos, mut collider, mut sprite) in flashes.iter_mut() {
        flash.frame_index += flash.speed * time.delta;
        if let Ok(gun) = guns.get(flash.owner) {
            pos.pos = gun.firing_point;
            collider.rect.set_center(Vec2::new(pos.pos.x.round(), pos.pos.y.round()));
        }
        if flash.frame_index >= flash.frames as f32 {
            commands.entity(entity).try_despawn();
            continue;
        }
        sprite.frame = flash.frame_index as usize;
        sprite.flip_h = flash.flipped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::boxcollider::Rect;
    use crate::components::timer::TimedState;

    fn particle(at: Vec2, direction: Vec2, velocity: f32) -> (BloodParticle, MapPosition, BoxCollider, Sprite) {
        let mut life = TimedState::new(3000.0);
        life.start();
        (
            BloodParticle {
                velocity_x: velocity,
                velocity_y: velocity,
                direction,
                gravity: 2400.0,
                life,
                scale: 1.0,
                settled: false,
            },
            MapPosition { pos: at },
            BoxCollider::visual(Rect::from_center(at, 8.0, 8.0)),
            Sprite::new(8.0, 8.0),
        )
    }

    #[test]
    fn particles_stick_to_moving_platforms() {
        let mut world = World::new();
        let mut time = WorldTime::default();
        time.delta = 0.01;
        world.insert_resource(time);
        let platform_rect = Rect::new(0.0, 100.0, 200.0, 16.0);
        let platform = world
            .spawn((Solid, MovingPlatform::new(100.0), BoxCollider::solid(platform_rect)))
            .id();
        // falling straight down onto the platform
        let drop = world.spawn(particle(Vec2::new(50.0, 90.0), Vec2::new(0.0, -1.0), 0.0)).id();

        let mut schedule = Schedule::default();
        schedule.add_systems(blood_particle);
        for _ in 0..30 {
            schedule.run(&mut world);
        }
        assert!(world.get::<BloodParticle>(drop).unwrap().settled);
        assert_eq!(world.get::<Parented>(drop).unwrap().platform, platform);
    }

    #[test]
    fn particles_settle_after_lifetime() {
        let mut world = World::new();
        let mut time = WorldTime::default();
        time.delta = 0.5;
        world.insert_resource(time);
        let drop = world.spawn(particle(Vec2::ZERO, Vec2::new(1.0, -1.0), 0.0)).id();
        let mut schedule = Schedule::default();
        schedule.add_systems(blood_particle);
        for _ in 0..6 {
            schedule.run(&mut world);
        }
        assert!(!world.get::<BloodParticle>(drop).unwrap().settled);
        schedule.run(&mut world);
        assert!(world.get::<BloodParticle>(drop).unwrap().settled);
    }

    #[test]
    fn flash_follows_owner_and_expires() {
        let mut world = World::new();
        let mut time = WorldTime::default();
        time.delta = 0.04;
        world.insert_resource(time);
        let mut gun = Gun::new(Vec2::new(58.0, -16.0), 1500.0, 150.0, 10);
        gun.firing_point = Vec2::new(300.0, 200.0);
        let owner = world.spawn(gun).id();
        let flash = world
            .spawn((
                MuzzleFlash {
                    owner,
                    frame_index: 0.0,
                    frames: 2,
                    speed: 20.0,
                    flipped: true,
                },
                MapPosition { pos: Vec2::ZERO },
                BoxCollider::visual(Rect::from_center(Vec2::ZERO, 24.0, 24.0)),
                Sprite::new(24.0, 24.0),
            ))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems(muzzle_flash);
        schedule.run(&mut world);
        assert_eq!(world.get::<MapPosition>(flash).unwrap().pos, Vec2::new(300.0, 200.0));
        assert!(world.get::<Sprite>(flash).unwrap().flip_h);
        schedule.run(&mut world);
        schedule.run(&mut world);
        assert!(world.get_entity(flash).is_err());
    }
}
