use bevy_ecs::prelude::Component;

/// Level geometry the player collides with and bullets stop on.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Solid;

/// Vertically oscillating platform. Also [`Solid`].
#[derive(Component, Clone, Copy, Debug)]
pub struct MovingPlatform {
    /// -1.0 moving up, 1.0 moving down.
    pub direction_y: f32,
    pub speed: f32,
    /// Vertical rect displacement applied this tick.
    pub delta_y: f32,
}

impl MovingPlatform {
    pub fn new(speed: f32) -> Self {
        Self {
            direction_y: -1.0,
            speed,
            delta_y: 0.0,
        }
    }

    pub fn descending(&self) -> bool {
        self.direction_y > 0.0
    }
}

/// Invisible rectangle that turns moving platforms around.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct PlatformBorder;
