use bevy_ecs::prelude::Resource;

/// Seeded random source shared by every system that rolls dice.
#[derive(Resource, Debug, Clone)]
pub struct SimRng(pub fastrand::Rng);

impl SimRng {
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }

    /// Uniform in `[min, max)`; `min` when the range is empty.
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + self.0.f32() * (max - min)
    }

    /// Whole milliseconds in `[min, max)`.
    pub fn range_ms(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.0.u32(min as u32..max as u32) as f32
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self::with_seed(0)
    }
}
