//! Gameplay tuning resource.
//!
//! Every speed, timer and capacity used by the simulation lives here with a
//! safe default. Values can be overridden from an INI file; missing keys keep
//! their defaults.
//!
//! # Configuration File Format
//!
//! ```ini
//! [player]
//! speed = 400
//! dash_speed = 1200
//! max_health = 5
//!
//! [enemy]
//! aggro_distance = 800
//! turn_delay_min = 1000
//! turn_delay_max = 4000
//!
//! [projectile]
//! fade_time = 3000
//!
//! [platform]
//! speed = 100
//!
//! [effects]
//! fire_animation_speed = 20
//!
//! [simulation]
//! seed = 42
//! ```
//!
//! All times are in milliseconds, speeds in pixels per second.

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

const DEFAULT_CONFIG_PATH: &str = "./runngun.ini";
const DEFAULT_SEED: u64 = 0x5eed;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTuning {
    pub speed: f32,
    pub dash_speed: f32,
    pub dash_time: f32,
    pub dash_invincibility: f32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub jump_speed: f32,
    pub wall_jump_speed: f32,
    pub wall_slide_speed: f32,
    pub knockback_speed: f32,
    pub knockback_time: f32,
    pub invincibility_time: f32,
    pub max_health: u32,
    pub bullet_speed: f32,
    pub bullet_delay: f32,
    pub bullet_x: f32,
    pub bullet_y: f32,
    pub bullet_y_duck: f32,
    pub bullet_y_jump: f32,
    pub jump_grace: f32,
    pub wall_jump_lockout: f32,
    pub trail_period: f32,
    pub max_trails: usize,
    pub gib_count: usize,
    pub max_blood: usize,
    pub animation_speed: f32,
    /// Upward speed given on spawn and respawn.
    pub respawn_speed: f32,
    /// Height of the strip probed below the player for moving floors.
    pub floor_probe: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 400.0,
            dash_speed: 1200.0,
            dash_time: 200.0,
            dash_invincibility: 100.0,
            gravity: 2400.0,
            terminal_velocity: 1600.0,
            jump_speed: 900.0,
            wall_jump_speed: 800.0,
            wall_slide_speed: 200.0,
            knockback_speed: 500.0,
            knockback_time: 300.0,
            invincibility_time: 1000.0,
            max_health: 5,
            bullet_speed: 1500.0,
            bullet_delay: 150.0,
            bullet_x: 58.0,
            bullet_y: -16.0,
            bullet_y_duck: 8.0,
            bullet_y_jump: -22.0,
            jump_grace: 250.0,
            wall_jump_lockout: 200.0,
            trail_period: 10.0,
            max_trails: 4,
            gib_count: 100,
            max_blood: 400,
            animation_speed: 10.0,
            respawn_speed: 400.0,
            floor_probe: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyTuning {
    pub animation_speed: f32,
    pub bullet_speed: f32,
    pub bullet_delay: f32,
    pub bullet_x: f32,
    pub bullet_y: f32,
    pub max_health: u32,
    pub blink_time: f32,
    pub turn_delay_min: f32,
    pub turn_delay_max: f32,
    pub aggro_distance: f32,
    /// Vertical slack above and below the rect for sighting the player.
    pub sight_band: f32,
    pub max_blood: usize,
    /// Animation speed multiplier applied on death.
    pub death_animation_factor: f32,
    /// Frame held while aiming.
    pub aim_frame: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            animation_speed: 8.0,
            bullet_speed: 800.0,
            bullet_delay: 1000.0,
            bullet_x: 64.0,
            bullet_y: -13.0,
            max_health: 3,
            blink_time: 200.0,
            turn_delay_min: 1000.0,
            turn_delay_max: 4000.0,
            aggro_distance: 800.0,
            sight_band: 50.0,
            max_blood: 2,
            death_animation_factor: 1.5,
            aim_frame: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileTuning {
    pub fade_time: f32,
    pub pool_capacity: usize,
    pub width: f32,
    pub height: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            fade_time: 3000.0,
            pool_capacity: 10,
            width: 16.0,
            height: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformTuning {
    pub speed: f32,
}

impl Default for PlatformTuning {
    fn default() -> Self {
        Self { speed: 100.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectsTuning {
    pub fire_animation_speed: f32,
    pub fire_frames: usize,
    pub splats_per_death: usize,
    pub splat_min_scale: f32,
    pub splat_max_scale: f32,
    pub particle_min_velocity: f32,
    pub particle_max_velocity: f32,
    pub particle_gravity: f32,
    pub particle_lifetime: f32,
    pub particle_min_scale: f32,
    pub particle_max_scale: f32,
    pub particle_size: f32,
    pub trail_alpha: f32,
}

impl Default for EffectsTuning {
    fn default() -> Self {
        Self {
            fire_animation_speed: 20.0,
            fire_frames: 2,
            splats_per_death: 2,
            splat_min_scale: 2.0,
            splat_max_scale: 4.0,
            particle_min_velocity: 100.0,
            particle_max_velocity: 1000.0,
            particle_gravity: 2400.0,
            particle_lifetime: 3000.0,
            particle_min_scale: 0.25,
            particle_max_scale: 1.25,
            particle_size: 8.0,
            trail_alpha: 0.5,
        }
    }
}

/// Gameplay tuning resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TuningConfig {
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub projectile: ProjectileTuning,
    pub platform: PlatformTuning,
    pub effects: EffectsTuning,
    /// Seed for [`SimRng`](crate::resources::rng::SimRng).
    pub seed: u64,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_f32(config: &Ini, section: &str, key: &str, target: &mut f32) {
    if let Some(v) = config.getfloat(section, key).ok().flatten() {
        *target = v as f32;
    }
}

fn read_u32(config: &Ini, section: &str, key: &str, target: &mut u32) {
    if let Some(v) = config.getuint(section, key).ok().flatten() {
        *target = v as u32;
    }
}

fn read_usize(config: &Ini, section: &str, key: &str, target: &mut usize) {
    if let Some(v) = config.getuint(section, key).ok().flatten() {
        *target = v as usize;
    }
}

impl TuningConfig {
    /// Create a configuration with safe default values.
    pub fn new() -> Self {
        Self {
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            projectile: ProjectileTuning::default(),
            platform: PlatformTuning::default(),
            effects: EffectsTuning::default(),
            seed: DEFAULT_SEED,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load overrides from the INI file at `config_path`.
    ///
    /// Missing values retain their current values.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let contents = std::fs::read_to_string(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.load_from_str(&contents)?;
        info!(
            "Loaded tuning from {:?}: player speed={}, health={}, enemy aggro={}, seed={}",
            self.config_path,
            self.player.speed,
            self.player.max_health,
            self.enemy.aggro_distance,
            self.seed
        );
        Ok(())
    }

    /// Load overrides from INI text.
    pub fn load_from_str(&mut self, contents: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(contents.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        let p = &mut self.player;
        read_f32(config, "player", "speed", &mut p.speed);
        read_f32(config, "player", "dash_speed", &mut p.dash_speed);
        read_f32(config, "player", "dash_time", &mut p.dash_time);
        read_f32(config, "player", "dash_invincibility", &mut p.dash_invincibility);
        read_f32(config, "player", "gravity", &mut p.gravity);
        read_f32(config, "player", "terminal_velocity", &mut p.terminal_velocity);
        read_f32(config, "player", "jump_speed", &mut p.jump_speed);
        read_f32(config, "player", "wall_jump_speed", &mut p.wall_jump_speed);
        read_f32(config, "player", "wall_slide_speed", &mut p.wall_slide_speed);
        read_f32(config, "player", "knockback_speed", &mut p.knockback_speed);
        read_f32(config, "player", "knockback_time", &mut p.knockback_time);
        read_f32(config, "player", "invincibility_time", &mut p.invincibility_time);
        read_u32(config, "player", "max_health", &mut p.max_health);
        read_f32(config, "player", "bullet_speed", &mut p.bullet_speed);
        read_f32(config, "player", "bullet_delay", &mut p.bullet_delay);
        read_f32(config, "player", "jump_grace", &mut p.jump_grace);
        read_f32(config, "player", "wall_jump_lockout", &mut p.wall_jump_lockout);
        read_f32(config, "player", "trail_period", &mut p.trail_period);
        read_usize(config, "player", "max_trails", &mut p.max_trails);
        read_usize(config, "player", "gib_count", &mut p.gib_count);
        read_usize(config, "player", "max_blood", &mut p.max_blood);
        read_f32(config, "player", "animation_speed", &mut p.animation_speed);
        read_f32(config, "player", "respawn_speed", &mut p.respawn_speed);

        let e = &mut self.enemy;
        read_f32(config, "enemy", "animation_speed", &mut e.animation_speed);
        read_f32(config, "enemy", "bullet_speed", &mut e.bullet_speed);
        read_f32(config, "enemy", "bullet_delay", &mut e.bullet_delay);
        read_u32(config, "enemy", "max_health", &mut e.max_health);
        read_f32(config, "enemy", "blink_time", &mut e.blink_time);
        read_f32(config, "enemy", "turn_delay_min", &mut e.turn_delay_min);
        read_f32(config, "enemy", "turn_delay_max", &mut e.turn_delay_max);
        read_f32(config, "enemy", "aggro_distance", &mut e.aggro_distance);
        read_f32(config, "enemy", "sight_band", &mut e.sight_band);
        read_usize(config, "enemy", "max_blood", &mut e.max_blood);

        read_f32(config, "projectile", "fade_time", &mut self.projectile.fade_time);
        read_usize(config, "projectile", "pool_capacity", &mut self.projectile.pool_capacity);

        read_f32(config, "platform", "speed", &mut self.platform.speed);

        let fx = &mut self.effects;
        read_f32(config, "effects", "fire_animation_speed", &mut fx.fire_animation_speed);
        read_f32(config, "effects", "particle_gravity", &mut fx.particle_gravity);
        read_f32(config, "effects", "particle_lifetime", &mut fx.particle_lifetime);
        read_f32(config, "effects", "particle_min_velocity", &mut fx.particle_min_velocity);
        read_f32(config, "effects", "particle_max_velocity", &mut fx.particle_max_velocity);

        if let Some(seed) = config.getuint("simulation", "seed").ok().flatten() {
            self.seed = seed;
        }
    }

    /// Write the current values back to `config_path`.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();
        let p = &self.player;
        config.set("player", "speed", Some(p.speed.to_string()));
        config.set("player", "dash_speed", Some(p.dash_speed.to_string()));
        config.set("player", "gravity", Some(p.gravity.to_string()));
        config.set("player", "jump_speed", Some(p.jump_speed.to_string()));
        config.set("player", "max_health", Some(p.max_health.to_string()));
        config.set("enemy", "aggro_distance", Some(self.enemy.aggro_distance.to_string()));
        config.set("enemy", "max_health", Some(self.enemy.max_health.to_string()));
        config.set("projectile", "fade_time", Some(self.projectile.fade_time.to_string()));
        config.set("platform", "speed", Some(self.platform.speed.to_string()));
        config.set("simulation", "seed", Some(self.seed.to_string()));
        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;
        info!("Saved tuning to {:?}", self.config_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let t = TuningConfig::new();
        assert!(t.player.dash_speed > t.player.speed);
        assert!(t.player.dash_invincibility < t.player.dash_time);
        assert!(t.enemy.turn_delay_min < t.enemy.turn_delay_max);
        assert_eq!(t.projectile.fade_time, 3000.0);
        assert_eq!(t.projectile.pool_capacity, 10);
        assert_eq!(t.player.max_trails, 4);
    }

    #[test]
    fn saved_file_loads_back() {
        let path = std::env::temp_dir().join(format!("runngun-tuning-{}.ini", std::process::id()));
        let mut t = TuningConfig::with_path(&path);
        t.player.speed = 321.0;
        t.seed = 99;
        t.save_to_file().unwrap();

        let mut loaded = TuningConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.player.speed, 321.0);
        assert_eq!(loaded.seed, 99);
    }

    #[test]
    fn ini_overrides_only_present_keys() {
        let mut t = TuningConfig::new();
        t.load_from_str("[player]\nspeed = 250\nmax_health = 9\n[enemy]\naggro_distance = 300.5\n[simulation]\nseed = 7\n")
            .unwrap();
        assert_eq!(t.player.speed, 250.0);
        assert_eq!(t.player.max_health, 9);
        assert_eq!(t.player.dash_speed, 1200.0);
        assert_eq!(t.enemy.aggro_distance, 300.5);
        assert_eq!(t.seed, 7);
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut t = TuningConfig::with_path("/definitely/not/here.ini");
        assert!(t.load_from_file().is_err());
        assert_eq!(t, TuningConfig::with_path("/definitely/not/here.ini"));
    }
}
