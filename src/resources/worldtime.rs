use bevy_ecs::prelude::Resource;

/// Simulation clock. `delta` is the scaled tick length in seconds.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// Tick length in milliseconds, the unit every timed state counts in.
    pub fn delta_ms(&self) -> f32 {
        self.delta * 1000.0
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed * 1000.0
    }
}
