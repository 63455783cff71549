use bevy_ecs::prelude::*;
use log::info;

use crate::components::enemy::Enemy;
use crate::components::lifecycle::Lifecycle;
use crate::components::player::Player;
use crate::resources::levelstatus::LevelStatus;

/// Publish enemy counts, player health and the win flag.
pub fn level_status(
    mut status: ResMut<LevelStatus>,
    enemies: Query<&Lifecycle, (With<Enemy>, Without<Player>)>,
    players: Query<&Lifecycle, With<Player>>,
) {
    let total = enemies.iter().count();
    let alive = enemies.iter().filter(|l| l.alive).count();
    let won = alive == 0;
    if won && !status.won {
        info!("level cleared");
    }
    status.enemies_total = total;
    status.enemies_alive = alive;
    status.won = won;
    if let Ok(player) = players.single() {
        status.player_health = player.health;
        status.player_alive = player.alive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::lifecycle::DeathCause;
    use glam::Vec2;

    #[test]
    fn counts_alive_enemies_and_flags_win() {
        let mut world = World::new();
        world.insert_resource(LevelStatus::default());
        let a = world.spawn((Enemy::new(1000.0, 200.0), Lifecycle::new(3, Vec2::ZERO, 2))).id();
        let b = world.spawn((Enemy::new(1000.0, 200.0), Lifecycle::new(3, Vec2::ZERO, 2))).id();
        let mut schedule = Schedule::default();
        schedule.add_systems(level_status);

        schedule.run(&mut world);
        assert_eq!(world.resource::<LevelStatus>().enemies_alive, 2);
        assert!(!world.resource::<LevelStatus>().won);

        for e in [a, b] {
            world.get_mut::<Lifecycle>(e).unwrap().kill(DeathCause::Damage);
        }
        schedule.run(&mut world);
        let status = world.resource::<LevelStatus>();
        assert_eq!(status.enemies_alive, 0);
        assert_eq!(status.enemies_total, 2);
        assert!(status.won);
    }
}
