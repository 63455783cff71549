//! Level setup and the per-tick schedule.
//!
//! [`LevelLayout`] describes the geometry handed over by the host (tiles,
//! moving platforms and their borders, spawn points). [`Simulation`] owns a
//! world populated from a layout and steps it one tick at a time.

use std::path::Path;

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::components::animation::{Activity, Animation, Facing, StatusKey};
use crate::components::boxcollider::{BoxCollider, Rect};
use crate::components::effects::{BloodParticle, BloodSplat, DashTrail, MuzzleFlash};
use crate::components::enemy::Enemy;
use crate::components::group::Faction;
use crate::components::gun::Gun;
use crate::components::lifecycle::Lifecycle;
use crate::components::mapposition::MapPosition;
use crate::components::platform::{MovingPlatform, PlatformBorder, Solid};
use crate::components::player::{Player, movement_hitbox};
use crate::components::projectile::Projectile;
use crate::components::sprite::{Blink, Sprite};
use crate::events::lifecycle::{DeathMessage, HurtMessage};
use crate::resources::animationstore::AnimationStore;
use crate::resources::audio::init_audio_messages;
use crate::resources::input::{InputSnapshot, InputState};
use crate::resources::levelstatus::LevelStatus;
use crate::resources::rng::SimRng;
use crate::resources::tuning::TuningConfig;
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::animation;
use crate::systems::audio::{
    forward_audio_cmds, poll_audio_messages, sync_playing_sounds, update_bevy_audio_cmds,
    update_bevy_audio_messages,
};
use crate::systems::damage::{death_effects, enemy_damage_reaction, player_damage_reaction};
use crate::systems::effects::{blood_particle, muzzle_flash};
use crate::systems::enemy::enemy_ai;
use crate::systems::input::update_input_state;
use crate::systems::levelstatus::level_status;
use crate::systems::lifecycle::{player_respawn, update_lifecycle_messages};
use crate::systems::platform::{moving_platform, platform_carry};
use crate::systems::player::{
    player_ability_timers, player_animation_state, player_input, player_movement,
};
use crate::systems::projectile::projectile;
use crate::systems::time::update_world_time;

pub const PLAYER_SET: &str = "player";
pub const ENEMY_SET: &str = "enemy";
pub const PLAYER_SIZE: Vec2 = Vec2::new(40.0, 64.0);
pub const ENEMY_SIZE: Vec2 = Vec2::new(48.0, 64.0);

/// Level geometry and spawn points, as produced by the map loader.
///
/// Spawn points are the mid-top of the spawned entity's rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    #[serde(default)]
    pub tiles: Vec<Rect>,
    #[serde(default)]
    pub platforms: Vec<Rect>,
    #[serde(default)]
    pub platform_borders: Vec<Rect>,
    pub player_spawn: Vec2,
    #[serde(default)]
    pub enemy_spawns: Vec<Vec2>,
    /// A player whose rect bottom passes this line falls to death.
    pub death_y: f32,
}

impl LevelLayout {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse level layout: {}", e))
    }

    /// Load a layout from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read level file '{}': {}", path.display(), e))?;
        let layout = Self::from_json(&json)?;
        if layout.tiles.is_empty() {
            warn!("level '{}' has no tiles", path.display());
        }
        Ok(layout)
    }

    /// A small built-in arena: a floor, a ledge, one lift and two enemies.
    pub fn demo() -> Self {
        let tiles = (0..20)
            .map(|i| Rect::new(i as f32 * 64.0, 576.0, 64.0, 64.0))
            .chain((0..3).map(|i| Rect::new(960.0 + i as f32 * 64.0, 384.0, 64.0, 32.0)))
            .collect();
        Self {
            tiles,
            platforms: vec![Rect::new(640.0, 448.0, 128.0, 16.0)],
            platform_borders: vec![
                Rect::new(640.0, 224.0, 128.0, 8.0),
                Rect::new(640.0, 568.0, 128.0, 8.0),
            ],
            player_spawn: Vec2::new(160.0, 448.0),
            enemy_spawns: vec![Vec2::new(1024.0, 330.0), Vec2::new(1184.0, 520.0)],
            death_y: 1200.0,
        }
    }
}

/// Clips for headless runs: uniform frame sizes with solid masks.
pub fn demo_animation_store() -> AnimationStore {
    let mut store = AnimationStore::default();
    store.insert_uniform_set(
        PLAYER_SET,
        PLAYER_SIZE.x,
        PLAYER_SIZE.y,
        &[
            (Activity::Walk, 8),
            (Activity::Idle, 4),
            (Activity::Duck, 1),
            (Activity::Jump, 1),
            (Activity::Dead, 1),
        ],
    );
    store.insert_uniform_set(
        ENEMY_SET,
        ENEMY_SIZE.x,
        ENEMY_SIZE.y,
        &[(Activity::Walk, 4), (Activity::Idle, 4), (Activity::Dead, 6)],
    );
    store
}

fn spawn_tiles(world: &mut World, tiles: &[Rect]) {
    for tile in tiles {
        world.spawn((
            Solid,
            BoxCollider::solid(*tile),
            MapPosition { pos: tile.center() },
            Sprite::new(tile.w, tile.h),
        ));
    }
}

fn spawn_platforms(world: &mut World, layout: &LevelLayout, tuning: &TuningConfig) {
    for rect in &layout.platforms {
        world.spawn((
            Solid,
            MovingPlatform::new(tuning.platform.speed),
            BoxCollider::solid(*rect),
            MapPosition { pos: rect.center() },
            Sprite::new(rect.w, rect.h),
        ));
    }
    for rect in &layout.platform_borders {
        world.spawn((PlatformBorder, BoxCollider::visual(*rect)));
    }
}

fn spawn_player(world: &mut World, layout: &LevelLayout, tuning: &TuningConfig) -> Entity {
    let t = &tuning.player;
    let rect = Rect::from_midtop(layout.player_spawn, PLAYER_SIZE.x, PLAYER_SIZE.y);
    let status = StatusKey::default();
    let mut gun = Gun::new(
        Vec2::new(t.bullet_x, t.bullet_y),
        t.bullet_speed,
        t.bullet_delay,
        tuning.projectile.pool_capacity,
    )
    .with_stance_offsets(t.bullet_y_duck, t.bullet_y_jump);
    gun.aim(rect.center(), status.facing, t.bullet_y_jump);
    world
        .spawn((
            Player::new(t, layout.death_y, rect),
            BoxCollider::with_hitbox(rect, movement_hitbox(rect)),
            MapPosition { pos: rect.center() },
            Animation::new(PLAYER_SET, status, t.animation_speed),
            gun,
            Lifecycle::new(t.max_health, rect.center(), t.max_blood).with_hit_invincibility(),
            Sprite::new(rect.w, rect.h),
            Faction::Player,
        ))
        .id()
}

/// Enemies stand on the tile under their mid-bottom, if there is one.
fn spawn_enemies(world: &mut World, layout: &LevelLayout, tuning: &TuningConfig, rng: &mut SimRng) {
    let t = &tuning.enemy;
    for spawn in &layout.enemy_spawns {
        let mut rect = Rect::from_midtop(*spawn, ENEMY_SIZE.x, ENEMY_SIZE.y);
        if let Some(tile) = layout
            .tiles
            .iter()
            .find(|tile| tile.contains_point(rect.midbottom()))
        {
            rect.set_bottom(tile.top());
        }
        let status = StatusKey::new(Facing::Left, Activity::Walk);
        let mut gun = Gun::new(
            Vec2::new(t.bullet_x, t.bullet_y),
            t.bullet_speed,
            t.bullet_delay,
            tuning.projectile.pool_capacity,
        );
        gun.aim(rect.center(), status.facing, t.bullet_y);
        world.spawn((
            Enemy::new(rng.range_ms(t.turn_delay_min, t.turn_delay_max), t.blink_time),
            BoxCollider::solid(rect),
            MapPosition { pos: rect.center() },
            Animation::new(ENEMY_SET, status, t.animation_speed),
            gun,
            Lifecycle::new(t.max_health, rect.center(), t.max_blood),
            Sprite::new(rect.w, rect.h),
            Faction::Enemy,
        ));
    }
}

/// Build the tick schedule. Every system runs once per tick in this order.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            (
                update_input_state,
                player_respawn,
                player_input,
                player_ability_timers,
                player_movement,
            )
                .chain(),
            (moving_platform, platform_carry, enemy_ai, projectile).chain(),
            (
                player_damage_reaction,
                enemy_damage_reaction,
                death_effects,
                blood_particle,
                muzzle_flash,
            )
                .chain(),
            (player_animation_state, animation, level_status).chain(),
            (forward_audio_cmds, poll_audio_messages, sync_playing_sounds).chain(),
            (
                update_bevy_audio_cmds,
                update_bevy_audio_messages,
                update_lifecycle_messages,
            )
                .chain(),
        )
            .chain(),
    );
    schedule
}

/// What an entity in a [`FrameSnapshot`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Enemy,
    Tile,
    Platform,
    Bullet,
    MuzzleFlash,
    BloodSplat,
    BloodParticle,
    DashTrail,
}

/// Render-facing state of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: u64,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub rect: Rect,
    pub status: Option<StatusKey>,
    pub frame: usize,
    pub hidden: bool,
    pub blink: Option<Blink>,
    pub alpha: f32,
    pub flip_h: bool,
    pub health: Option<u32>,
}

/// Everything a renderer or HUD needs after one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub elapsed: f32,
    pub status: LevelStatus,
    pub entities: Vec<EntitySnapshot>,
}

fn kind_of(entity: &EntityRef) -> Option<EntityKind> {
    let kind = if entity.contains::<Player>() {
        EntityKind::Player
    } else if entity.contains::<Enemy>() {
        EntityKind::Enemy
    } else if entity.contains::<MovingPlatform>() {
        EntityKind::Platform
    } else if entity.contains::<Solid>() {
        EntityKind::Tile
    } else if entity.contains::<Projectile>() {
        EntityKind::Bullet
    } else if entity.contains::<MuzzleFlash>() {
        EntityKind::MuzzleFlash
    } else if entity.contains::<BloodSplat>() {
        EntityKind::BloodSplat
    } else if entity.contains::<BloodParticle>() {
        EntityKind::BloodParticle
    } else if entity.contains::<DashTrail>() {
        EntityKind::DashTrail
    } else {
        return None;
    };
    Some(kind)
}

/// A level world plus the schedule that steps it.
pub struct Simulation {
    pub world: World,
    pub schedule: Schedule,
    player: Entity,
}

impl Simulation {
    pub fn new(tuning: TuningConfig, layout: &LevelLayout, store: AnimationStore) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(InputSnapshot::new());
        world.insert_resource(InputState::default());
        world.insert_resource(LevelStatus::default());
        world.insert_resource(store);
        init_audio_messages(&mut world);
        world.init_resource::<Messages<HurtMessage>>();
        world.init_resource::<Messages<DeathMessage>>();

        let mut rng = SimRng::with_seed(tuning.seed);
        spawn_tiles(&mut world, &layout.tiles);
        spawn_platforms(&mut world, layout, &tuning);
        let player = spawn_player(&mut world, layout, &tuning);
        spawn_enemies(&mut world, layout, &tuning, &mut rng);
        info!(
            "level loaded: {} tiles, {} platforms, {} enemies",
            layout.tiles.len(),
            layout.platforms.len(),
            layout.enemy_spawns.len()
        );

        world.insert_resource(rng);
        world.insert_resource(tuning);
        Self {
            world,
            schedule: build_schedule(),
            player,
        }
    }

    /// Step the level by `dt` seconds with `input` held.
    pub fn tick(&mut self, dt: f32, input: &InputSnapshot) {
        self.world.insert_resource(input.clone());
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn status(&self) -> &LevelStatus {
        self.world.resource::<LevelStatus>()
    }

    /// Render-facing state of every visible entity, ordered by entity id.
    pub fn snapshot(&mut self) -> FrameSnapshot {
        let time = *self.world.resource::<WorldTime>();
        let status = self.world.resource::<LevelStatus>().clone();
        let mut query = self.world.query::<EntityRef>();
        let mut entities: Vec<EntitySnapshot> = query
            .iter(&self.world)
            .filter_map(|entity| {
                let kind = kind_of(&entity)?;
                let pos = entity.get::<MapPosition>()?.pos;
                let rect = entity.get::<BoxCollider>()?.rect;
                let sprite = entity.get::<Sprite>();
                Some(EntitySnapshot {
                    id: entity.id().to_bits(),
                    kind,
                    pos,
                    rect,
                    status: entity.get::<Animation>().map(|a| a.status),
                    frame: sprite.map_or(0, |s| s.frame),
                    hidden: sprite.is_some_and(|s| s.hidden()),
                    blink: sprite.and_then(|s| s.blink),
                    alpha: sprite.map_or(1.0, |s| s.alpha),
                    flip_h: sprite.is_some_and(|s| s.flip_h),
                    health: entity.get::<Lifecycle>().map(|l| l.health),
                })
            })
            .collect();
        entities.sort_by_key(|e| e.id);
        FrameSnapshot {
            frame: time.frame_count,
            elapsed: time.elapsed,
            status,
            entities,
        }
    }
}
