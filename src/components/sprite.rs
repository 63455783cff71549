use std::sync::Arc;

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::components::animation::StatusKey;
use crate::components::mask::Mask;

/// Two-phase flash shown while an entity is invincible or was just hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Blink {
    Bright,
    Dim,
}

impl Blink {
    /// `sin(elapsed_ms / 25) >= 0` is the bright phase.
    pub fn phase(elapsed_ms: f32) -> Self {
        if (elapsed_ms / 25.0).sin() >= 0.0 {
            Blink::Bright
        } else {
            Blink::Dim
        }
    }
}

/// The frame currently shown for an entity.
///
/// Animated entities get `clip` and `frame` from their
/// [`Animation`](crate::components::animation::Animation); the mask is the
/// frame's opacity mask used for per-pixel hit tests.
#[derive(Component, Clone, Debug)]
pub struct Sprite {
    pub clip: Option<StatusKey>,
    pub frame: usize,
    pub width: f32,
    pub height: f32,
    pub mask: Option<Arc<Mask>>,
    pub flip_h: bool,
    /// 0.0 hides the sprite, 0.5 is used for dash trails.
    pub alpha: f32,
    pub blink: Option<Blink>,
}

impl Sprite {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            clip: None,
            frame: 0,
            width,
            height,
            mask: None,
            flip_h: false,
            alpha: 1.0,
            blink: None,
        }
    }

    pub fn hidden(&self) -> bool {
        self.alpha <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blink_phase_follows_sine() {
        assert_eq!(Blink::phase(0.0), Blink::Bright);
        // pi * 25 ms into the cycle the sine turns negative
        assert_eq!(Blink::phase(25.0 * 3.3), Blink::Dim);
        assert_eq!(Blink::phase(25.0 * 6.5), Blink::Bright);
    }
}
