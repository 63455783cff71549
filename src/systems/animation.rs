//! Animation system.
//!
//! [`animation`] advances every [`Animation`] and, when the displayed frame
//! or the status changed, copies the new frame into the entity's [`Sprite`].
//!
//! # Animation Flow
//!
//! 1. Clips are registered per set and [`StatusKey`](crate::components::animation::StatusKey)
//!    in the [`AnimationStore`]
//! 2. Controllers set `Animation::status` (facing and activity) during the tick
//! 3. This system advances the frame index and refreshes the sprite
//!
//! A status without a clip in the store is a broken asset set and panics.

use bevy_ecs::prelude::*;

use crate::components::animation::Animation;
use crate::components::lifecycle::Lifecycle;
use crate::components::sprite::Sprite;
use crate::resources::animationstore::AnimationStore;
use crate::resources::worldtime::WorldTime;

/// Advance animation playback and update the sprite frame.
///
/// Contract
/// - Reads [`WorldTime`] for the delta.
/// - Looks up clips in [`AnimationStore`]; dead entities freeze on the last
///   frame instead of looping.
/// - Writes [`Sprite`] clip, frame, size and mask only on change.
pub fn animation(
    mut query: Query<(&mut Animation, &mut Sprite, Option<&Lifecycle>)>,
    store: Res<AnimationStore>,
    time: Res<WorldTime>,
) {
    for (mut anim, mut sprite, life) in query.iter_mut() {
        let dead = life.is_some_and(|l| l.is_dead());
        let clip = store.clip(&anim.set, anim.status);
        if !anim.advance(time.delta, clip.len(), dead) {
            continue;
        }
        let frame = anim.frame().min(clip.len() - 1);
        let info = &clip.frames[frame];
        sprite.clip = Some(anim.status);
        sprite.frame = frame;
        sprite.width = info.width;
        sprite.height = info.height;
        sprite.mask = info.mask.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::animation::{Activity, Facing, StatusKey};

    fn store() -> AnimationStore {
        let mut store = AnimationStore::default();
        store.insert_uniform_set(
            "enemy",
            48.0,
            64.0,
            &[(Activity::Walk, 4), (Activity::Dead, 3)],
        );
        store
    }

    fn world_with(status: StatusKey, dead: bool) -> (World, Entity) {
        let mut world = World::new();
        let mut time = WorldTime::default();
        time.delta = 0.1;
        world.insert_resource(time);
        world.insert_resource(store());
        let mut life = Lifecycle::new(3, glam::Vec2::ZERO, 2);
        if dead {
            life.alive = false;
        }
        let e = world
            .spawn((Animation::new("enemy", status, 10.0), Sprite::new(1.0, 1.0), life))
            .id();
        (world, e)
    }

    #[test]
    fn alive_clip_loops_and_sprite_follows() {
        let (mut world, e) = world_with(StatusKey::new(Facing::Left, Activity::Walk), false);
        let mut schedule = Schedule::default();
        schedule.add_systems(animation);
        schedule.run(&mut world);
        let sprite = world.get::<Sprite>(e).unwrap();
        assert_eq!(sprite.frame, 1);
        assert_eq!(sprite.width, 48.0);
        assert_eq!(sprite.clip, Some(StatusKey::new(Facing::Left, Activity::Walk)));
        for _ in 0..3 {
            schedule.run(&mut world);
        }
        assert_eq!(world.get::<Sprite>(e).unwrap().frame, 0);
    }

    #[test]
    fn dead_clip_freezes_on_last_frame() {
        let (mut world, e) = world_with(StatusKey::new(Facing::Right, Activity::Dead), true);
        let mut schedule = Schedule::default();
        schedule.add_systems(animation);
        for _ in 0..10 {
            schedule.run(&mut world);
        }
        assert_eq!(world.get::<Sprite>(e).unwrap().frame, 2);
    }

    #[test]
    #[should_panic(expected = "has no clip")]
    fn missing_clip_is_fatal() {
        let (mut world, _) = world_with(StatusKey::new(Facing::Right, Activity::Duck), false);
        let mut schedule = Schedule::default();
        schedule.add_systems(animation);
        schedule.run(&mut world);
    }
}
