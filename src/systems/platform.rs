//! Moving platforms and the entities they carry.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::boxcollider::BoxCollider;
use crate::components::effects::Parented;
use crate::components::lifecycle::Lifecycle;
use crate::components::mapposition::MapPosition;
use crate::components::platform::{MovingPlatform, PlatformBorder};
use crate::components::player::{Player, wall_hitbox};
use crate::resources::worldtime::WorldTime;

/// Move every platform along its axis and turn it around on borders and
/// riders.
///
/// `MapPosition` is the rect centre; the rect itself is snapped to whole
/// pixels on its top-left corner.
#[allow(clippy::type_complexity)]
pub fn moving_platform(
    time: Res<WorldTime>,
    mut platforms: Query<
        (Entity, &mut MovingPlatform, &mut MapPosition, &mut BoxCollider),
        (Without<Player>, Without<PlatformBorder>),
    >,
    borders: Query<&BoxCollider, (With<PlatformBorder>, Without<MovingPlatform>, Without<Player>)>,
    mut riders: Query<
        (&mut Player, &mut BoxCollider, &mut MapPosition, &Lifecycle),
        (Without<MovingPlatform>, Without<PlatformBorder>),
    >,
) {
    let dt = time.delta;
    for (entity, mut platform, mut pos, mut collider) in platforms.iter_mut() {
        let old_top = collider.rect.top();
        let half = Vec2::new(collider.rect.w, collider.rect.h) * 0.5;

        pos.pos.y += platform.speed * platform.direction_y * dt;
        let topleft = (pos.pos - half).round();
        collider.prev_hitbox = collider.hitbox.unwrap_or(collider.rect);
        collider.rect.set_topleft(topleft);

        if let Some(border) = borders.iter().find(|b| b.rect.overlaps(&collider.rect)) {
            if platform.descending() {
                collider.rect.set_bottom(border.rect.top());
            } else {
                collider.rect.set_top(border.rect.bottom());
            }
            platform.direction_y = -platform.direction_y;
            pos.pos = collider.rect.center();
            debug!("platform {:?} turned at border", entity);
        }

        for (mut player, mut rider, mut rider_pos, life) in riders.iter_mut() {
            if life.is_dead() || !collider.rect.overlaps(&rider.rect) {
                continue;
            }
            let Some(mut rider_hitbox) = rider.hitbox else {
                continue;
            };
            if !rider_hitbox.overlaps(&collider.rect) {
                continue;
            }
            if collider.rect.center_y() < rider.rect.center_y() {
                // came down on the rider's head
                collider.rect.set_bottom(rider.rect.top());
                pos.pos = collider.rect.center();
                platform.direction_y = -platform.direction_y;
            } else if !platform.descending() {
                // rising into a rider standing on top
                rider_hitbox.set_bottom(collider.rect.top());
                rider.hitbox = Some(rider_hitbox);
                rider.rect.set_center(rider_hitbox.center());
                rider_pos.pos = rider_hitbox.center();
                player.wall_hitbox = wall_hitbox(rider.rect, rider_hitbox.center());
                player.vertical_speed = 0.0;
                platform.direction_y = -platform.direction_y;
            }
        }

        collider.hitbox = Some(collider.rect);
        platform.delta_y = collider.rect.top() - old_top;
    }
}

/// Apply each platform's vertical displacement to the entities resting on it.
pub fn platform_carry(
    platforms: Query<&MovingPlatform>,
    mut carried: Query<(&Parented, &mut MapPosition, &mut BoxCollider), Without<MovingPlatform>>,
) {
    for (parent, mut pos, mut collider) in carried.iter_mut() {
        let Ok(platform) = platforms.get(parent.platform) else {
            continue;
        };
        if platform.delta_y == 0.0 {
            continue;
        }
        collider.rect.y += platform.delta_y;
        pos.pos.y += platform.delta_y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::boxcollider::Rect;
    use crate::components::player::movement_hitbox;
    use crate::resources::tuning::PlayerTuning;

    fn spawn_platform(world: &mut World, rect: Rect) -> Entity {
        world
            .spawn((
                MovingPlatform::new(100.0),
                MapPosition { pos: rect.center() },
                BoxCollider::solid(rect),
            ))
            .id()
    }

    fn run(world: &mut World, ticks: usize, dt: f32) {
        let mut schedule = Schedule::default();
        schedule.add_systems((moving_platform, platform_carry).chain());
        for _ in 0..ticks {
            world.resource_mut::<WorldTime>().delta = dt;
            schedule.run(world);
        }
    }

    #[test]
    fn turns_around_at_border() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        let platform = spawn_platform(&mut world, Rect::new(0.0, 100.0, 64.0, 16.0));
        world.spawn((PlatformBorder, BoxCollider::visual(Rect::new(0.0, 60.0, 64.0, 10.0))));

        run(&mut world, 40, 0.01);
        let p = world.get::<MovingPlatform>(platform).unwrap();
        assert!(p.descending());
        let rect = world.get::<BoxCollider>(platform).unwrap().rect;
        assert!(rect.top() >= 70.0);
    }

    #[test]
    fn carries_parented_entities() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        let platform = spawn_platform(&mut world, Rect::new(0.0, 100.0, 64.0, 16.0));
        let blood = world
            .spawn((
                Parented { platform },
                MapPosition {
                    pos: Vec2::new(10.0, 98.0),
                },
                BoxCollider::visual(Rect::new(8.0, 96.0, 4.0, 4.0)),
            ))
            .id();

        run(&mut world, 10, 0.1);
        let top = world.get::<BoxCollider>(platform).unwrap().rect.top();
        let drop = world.get::<BoxCollider>(blood).unwrap().rect.top();
        assert_eq!(top, 0.0);
        assert_eq!(drop, -4.0);
        assert_eq!(world.get::<MapPosition>(blood).unwrap().pos.y, -2.0);
    }

    #[test]
    fn rising_into_rider_pushes_and_reverses() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        let platform = spawn_platform(&mut world, Rect::new(0.0, 100.0, 64.0, 16.0));
        let rect = Rect::new(12.0, 36.0, 40.0, 64.0);
        let rider = world
            .spawn((
                Player::new(&PlayerTuning::default(), 1000.0, rect),
                BoxCollider::with_hitbox(rect, movement_hitbox(rect)),
                MapPosition { pos: rect.center() },
                Lifecycle::new(5, rect.center(), 4),
            ))
            .id();

        run(&mut world, 1, 0.05);
        let platform_top = world.get::<BoxCollider>(platform).unwrap().rect.top();
        assert_eq!(platform_top, 95.0);
        let hitbox = world.get::<BoxCollider>(rider).unwrap().hitbox.unwrap();
        assert_eq!(hitbox.bottom(), 95.0);
        assert_eq!(world.get::<Player>(rider).unwrap().vertical_speed, 0.0);
        assert!(world.get::<MovingPlatform>(platform).unwrap().descending());
    }
}
