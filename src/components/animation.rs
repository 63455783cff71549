//! Status-keyed animation playback.
//!
//! An entity's clip is selected by a [`StatusKey`], the pair of where it faces
//! and what it is doing. The [`Animation`] component carries a fractional
//! frame index advanced by `speed * dt`; the displayed frame is the truncated
//! index. The sprite is only refreshed when the truncated frame or the status
//! changes, or when a refresh is forced.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1.0 for left, 1.0 for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// Negative values face left, everything else faces right.
    pub fn from_sign(x: f32) -> Self {
        if x < 0.0 { Facing::Left } else { Facing::Right }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activity {
    Walk,
    Idle,
    Duck,
    Jump,
    Dead,
}

/// Clip selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusKey {
    pub facing: Facing,
    pub activity: Activity,
}

impl StatusKey {
    pub fn new(facing: Facing, activity: Activity) -> Self {
        Self { facing, activity }
    }
}

impl Default for StatusKey {
    fn default() -> Self {
        Self::new(Facing::Right, Activity::Walk)
    }
}

#[derive(Debug, Clone, Component)]
pub struct Animation {
    /// Animation set in the [`AnimationStore`](crate::resources::animationstore::AnimationStore).
    pub set: String,
    pub status: StatusKey,
    pub frame_index: f32,
    /// Frames per second.
    pub speed: f32,
    /// Play the clip backwards (strafing against the facing direction).
    pub reversed: bool,
    last_frame: i32,
    last_status: StatusKey,
}

impl Animation {
    pub fn new(set: impl Into<String>, status: StatusKey, speed: f32) -> Self {
        Self {
            set: set.into(),
            status,
            frame_index: 0.0,
            speed,
            reversed: false,
            last_frame: -1,
            last_status: status,
        }
    }

    /// Truncated frame index.
    pub fn frame(&self) -> usize {
        self.frame_index.max(0.0) as usize
    }

    /// Next [`advance`](Self::advance) reports a change even if nothing moved.
    pub fn force_refresh(&mut self) {
        self.last_frame = -1;
    }

    /// Jump to `frame` and refresh the sprite.
    pub fn set_frame(&mut self, frame: f32) {
        self.frame_index = frame;
        self.force_refresh();
    }

    /// Advance playback by `dt` seconds over a clip of `clip_len` frames.
    ///
    /// Reversed playback first adds then subtracts twice the step. Past the end
    /// the index clamps to the last frame for dead entities and wraps to 0
    /// otherwise; below zero it wraps to just under `clip_len`. Returns `true`
    /// when the displayed frame has to be updated.
    pub fn advance(&mut self, dt: f32, clip_len: usize, dead: bool) -> bool {
        let len = clip_len as f32;
        let step = self.speed * dt;
        self.frame_index += step;
        if self.reversed {
            self.frame_index -= step * 2.0;
        }
        if self.frame_index >= len {
            if dead {
                self.frame_index = len - 1.0;
                self.last_frame = self.frame_index as i32 - 1;
            } else {
                self.frame_index = 0.0;
                self.last_frame = -1;
            }
        }
        if self.frame_index < 0.0 {
            self.frame_index = len - 0.01;
            self.last_frame = -1;
        }
        let frame = self.frame_index as i32;
        if frame != self.last_frame || self.status != self.last_status {
            self.last_frame = frame;
            self.last_status = self.status;
            return true;
        }
        false
    }
}
