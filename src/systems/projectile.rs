//! Firing and bullet flight.
//!
//! [`fire`] is shared by the player and enemy controllers: it consumes the
//! gun's ready flag, plays the shot, spawns a muzzle flash that follows the
//! shooter and a bullet at the firing point, and evicts the shooter's oldest
//! bullet past the pool capacity.
//!
//! [`projectile`] moves bullets. Per tick each bullet is hit-tested first,
//! then advanced, then aged. Hits on the opposing faction apply damage right
//! away so a second bullet in the same tick sees the target's new state.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::boxcollider::{BoxCollider, Rect};
use crate::components::effects::MuzzleFlash;
use crate::components::group::Faction;
use crate::components::gun::Gun;
use crate::components::lifecycle::{DamageOutcome, DeathCause, Damageable, Lifecycle};
use crate::components::mapposition::MapPosition;
use crate::components::mask::Shape;
use crate::components::platform::Solid;
use crate::components::projectile::Projectile;
use crate::components::sprite::Sprite;
use crate::events::audio::Sfx;
use crate::events::lifecycle::{DeathMessage, HurtMessage};
use crate::resources::audio::Audio;
use crate::resources::tuning::TuningConfig;
use crate::resources::worldtime::WorldTime;

const FLASH_SIZE: f32 = 24.0;

/// Fire `gun` if it is ready. Returns the spawned bullet.
pub fn fire(
    commands: &mut Commands,
    audio: &mut Audio,
    tuning: &TuningConfig,
    shooter: Entity,
    faction: Faction,
    gun: &mut Gun,
) -> Option<Entity> {
    if !gun.trigger() {
        return None;
    }
    audio.play(Sfx::Shoot);
    let at = gun.firing_point;
    let flipped = gun.direction_x < 0.0;

    let mut flash_sprite = Sprite::new(FLASH_SIZE, FLASH_SIZE);
    flash_sprite.flip_h = flipped;
    commands.spawn((
        MuzzleFlash {
            owner: shooter,
            frame_index: 0.0,
            frames: tuning.effects.fire_frames,
            speed: tuning.effects.fire_animation_speed,
            flipped,
        },
        MapPosition { pos: at },
        BoxCollider::visual(Rect::from_center(at, FLASH_SIZE, FLASH_SIZE)),
        flash_sprite,
    ));

    let p = &tuning.projectile;
    let rect = Rect::from_center(at, p.width, p.height);
    let mut bullet_sprite = Sprite::new(p.width, p.height);
    bullet_sprite.flip_h = flipped;
    let bullet = commands
        .spawn((
            Projectile::new(gun.direction_x, gun.bullet_speed, faction.opposing(), p.fade_time, shooter),
            faction,
            MapPosition { pos: at },
            BoxCollider::solid(rect),
            bullet_sprite,
        ))
        .id();
    if let Some(oldest) = gun.bullets.push(bullet) {
        commands.entity(oldest).try_despawn();
    }
    Some(bullet)
}

/// Hit-test, advance and age every bullet.
#[allow(clippy::type_complexity)]
pub fn projectile(
    mut commands: Commands,
    time: Res<WorldTime>,
    mut bullets: Query<(Entity, &mut Projectile, &mut MapPosition, &mut BoxCollider, &Sprite)>,
    mut targets: Query<
        (Entity, &Faction, &BoxCollider, Option<&Sprite>, Option<&mut Lifecycle>),
        Without<Projectile>,
    >,
    solids: Query<(&BoxCollider, Option<&Sprite>), (With<Solid>, Without<Projectile>)>,
    mut guns: Query<&mut Gun, Without<Projectile>>,
    mut hurt: MessageWriter<HurtMessage>,
    mut died: MessageWriter<DeathMessage>,
) {
    let dt = time.delta;
    for (entity, mut bullet, mut pos, mut collider, sprite) in bullets.iter_mut() {
        let shape = Shape::new(collider.rect, sprite.mask.as_deref());
        let mut destroyed = false;

        // opposing faction first
        let hit = targets.iter_mut().find(|(_, faction, target_collider, target_sprite, _)| {
            **faction == bullet.target
                && Shape::new(
                    target_collider.rect,
                    target_sprite.and_then(|s| s.mask.as_deref()),
                )
                .overlaps(&shape)
        });
        if let Some((target, _, _, _, life)) = hit {
            match life {
                Some(mut life) => {
                    if life.alive && life.vulnerable {
                        match life.take_damage() {
                            DamageOutcome::Hurt => {
                                hurt.write(HurtMessage { entity: target });
                            }
                            DamageOutcome::Killed => {
                                died.write(DeathMessage {
                                    entity: target,
                                    cause: DeathCause::Damage,
                                });
                            }
                            DamageOutcome::Ignored => {}
                        }
                        destroyed = true;
                    }
                }
                // nothing to damage
                None => destroyed = true,
            }
        }

        if !destroyed {
            destroyed = solids.iter().any(|(solid, solid_sprite)| {
                Shape::new(solid.rect, solid_sprite.and_then(|s| s.mask.as_deref())).overlaps(&shape)
            });
        }

        if !destroyed {
            pos.pos += bullet.direction * bullet.speed * dt;
            let center = Vec2::new(pos.pos.x.round(), pos.pos.y.round());
            collider.prev_hitbox = collider.rect;
            collider.rect.set_center(center);
            collider.hitbox = Some(collider.rect);
            bullet.age.advance(time.delta_ms());
            destroyed = bullet.age.expired();
        }

        if destroyed {
            debug!("bullet {:?} removed after {:.0} ms", entity, bullet.age.elapsed);
            if let Ok(mut gun) = guns.get_mut(bullet.shooter) {
                gun.bullets.remove(entity);
            }
            commands.entity(entity).try_despawn();
        }
    }
}
