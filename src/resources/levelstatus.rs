use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

/// Level-wide status published once per tick for the HUD.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelStatus {
    pub enemies_alive: usize,
    pub enemies_total: usize,
    /// No enemy left alive.
    pub won: bool,
    pub player_health: u32,
    pub player_alive: bool,
    pub player_deaths: u32,
}
