//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during a tick: input, timing, tuning, asset clips and
//! the audio bridge.
//!
//! Overview
//! - `animationstore` – clips per animation set and status key
//! - `audio` – bridge and channels for the background audio thread
//! - `input` – host snapshot of held actions and the derived edge state
//! - `levelstatus` – HUD-facing counters and the win flag
//! - `rng` – seeded random source
//! - `tuning` – gameplay constants, overridable from an INI file
//! - `worldtime` – simulation time and delta
pub mod animationstore;
pub mod audio;
pub mod input;
pub mod levelstatus;
pub mod rng;
pub mod tuning;
pub mod worldtime;
