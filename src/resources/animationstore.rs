//! Animation clip registry.
//!
//! Frames are supplied by the host (asset loading is external). Each
//! animation set maps every [`StatusKey`] its entities can reach to a
//! non-empty clip. Looking up a missing set or key is a broken asset
//! contract and panics with a descriptive message.

use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

use crate::components::animation::{Activity, Facing, StatusKey};
use crate::components::mask::Mask;

/// Size and opacity of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInfo {
    pub width: f32,
    pub height: f32,
    pub mask: Option<Arc<Mask>>,
}

impl FrameInfo {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            mask: None,
        }
    }

    pub fn with_mask(mut self, mask: Mask) -> Self {
        self.mask = Some(Arc::new(mask));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub frames: Vec<FrameInfo>,
}

impl AnimationClip {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

pub type AnimationSet = FxHashMap<StatusKey, AnimationClip>;

/// Central registry of clips keyed by set name and status.
#[derive(Resource, Debug, Clone, Default)]
pub struct AnimationStore {
    pub sets: FxHashMap<String, AnimationSet>,
}

impl AnimationStore {
    pub fn insert_clip(&mut self, set: &str, key: StatusKey, frames: Vec<FrameInfo>) {
        assert!(
            !frames.is_empty(),
            "animation set '{}' clip {:?} must have at least one frame",
            set,
            key
        );
        self.sets
            .entry(set.to_string())
            .or_default()
            .insert(key, AnimationClip { frames });
    }

    /// Clip for `key` in `set`. Panics if missing.
    pub fn clip(&self, set: &str, key: StatusKey) -> &AnimationClip {
        let Some(clips) = self.sets.get(set) else {
            panic!("animation set '{}' is not loaded", set);
        };
        match clips.get(&key) {
            Some(clip) => clip,
            None => panic!("animation set '{}' has no clip for {:?}", set, key),
        }
    }

    /// Frame `index` of the clip, clamped to the last frame.
    pub fn frame(&self, set: &str, key: StatusKey, index: usize) -> &FrameInfo {
        let clip = self.clip(set, key);
        &clip.frames[index.min(clip.len() - 1)]
    }

    /// Register one clip per (facing, activity) pair with `counts[activity]`
    /// frames of a fixed size and solid masks. Used for headless runs where no
    /// art is loaded.
    pub fn insert_uniform_set(
        &mut self,
        set: &str,
        width: f32,
        height: f32,
        counts: &[(Activity, usize)],
    ) {
        let mask = Arc::new(Mask::solid(width as u32, height as u32));
        for facing in [Facing::Left, Facing::Right] {
            for (activity, count) in counts {
                let frames = (0..*count)
                    .map(|_| FrameInfo {
                        width,
                        height,
                        mask: Some(mask.clone()),
                    })
                    .collect();
                self.insert_clip(set, StatusKey::new(facing, *activity), frames);
            }
        }
    }
}
