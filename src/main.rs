//! runngun headless runner.
//!
//! Steps a level for a fixed number of ticks with scripted input and prints
//! either a summary or one JSON [`FrameSnapshot`](runngun::game::FrameSnapshot)
//! per tick. Rendering and real input belong to the host; this binary is the
//! reference loop a host would wrap.
//!
//! # Main Loop
//!
//! 1. Load tuning (INI) and the level layout (JSON), falling back to defaults
//! 2. Build the [`Simulation`] and start the audio sink thread
//! 3. For every tick: pick the scripted input, step, optionally print
//! 4. Shut down the audio thread
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --ticks 600 --json
//! ```

use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

use runngun::events::input::InputAction;
use runngun::game::{LevelLayout, Simulation, demo_animation_store};
use runngun::resources::audio::{setup_audio, shutdown_audio};
use runngun::resources::input::InputSnapshot;
use runngun::resources::tuning::TuningConfig;

/// runngun simulation core
#[derive(Parser)]
#[command(version, about = "Headless run-and-gun level simulation")]
struct Cli {
    /// Tuning INI file. Missing file or keys keep the defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Level layout JSON file. The built-in demo arena is used if omitted.
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Tick length in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Override the RNG seed from the config.
    #[arg(long)]
    seed: Option<u64>,

    /// Print a JSON frame snapshot after every tick.
    #[arg(long)]
    json: bool,

    /// Input script JSON file: a list of `{ from, to, actions }` steps.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Write the effective tuning to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

/// Actions held for ticks `from..to`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScriptStep {
    from: u64,
    to: u64,
    actions: Vec<InputAction>,
}

fn demo_script() -> Vec<ScriptStep> {
    use InputAction::*;
    vec![
        ScriptStep { from: 30, to: 150, actions: vec![MoveRight] },
        ScriptStep { from: 60, to: 70, actions: vec![Jump] },
        ScriptStep { from: 90, to: 95, actions: vec![Dash] },
        ScriptStep { from: 150, to: 400, actions: vec![MoveRight, Shoot] },
        ScriptStep { from: 200, to: 210, actions: vec![Jump] },
    ]
}

fn load_script(path: &PathBuf) -> Result<Vec<ScriptStep>, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read script '{}': {}", path.display(), e))?;
    serde_json::from_str(&json).map_err(|e| format!("Failed to parse script: {}", e))
}

fn input_at(script: &[ScriptStep], tick: u64) -> InputSnapshot {
    InputSnapshot::from_actions(
        script
            .iter()
            .filter(|step| (step.from..step.to).contains(&tick))
            .flat_map(|step| step.actions.iter().copied()),
    )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut tuning = match &cli.config {
        Some(path) => TuningConfig::with_path(path),
        None => TuningConfig::new(),
    };
    if cli.config.is_some()
        && let Err(e) = tuning.load_from_file()
    {
        log::warn!("{}; using default tuning", e);
    }
    if let Some(seed) = cli.seed {
        tuning.seed = seed;
    }

    // Early-exit: dump tuning and quit
    if cli.write_config {
        if let Err(e) = tuning.save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Tuning written to {}", tuning.config_path.display());
        return;
    }

    let layout = match &cli.level {
        Some(path) => LevelLayout::load_from_file(path).unwrap_or_else(|e| {
            log::warn!("{}; using the demo level", e);
            LevelLayout::demo()
        }),
        None => LevelLayout::demo(),
    };

    let script = match &cli.script {
        Some(path) => load_script(path).unwrap_or_else(|e| {
            log::warn!("{}; using the demo script", e);
            demo_script()
        }),
        None => demo_script(),
    };

    let mut sim = Simulation::new(tuning, &layout, demo_animation_store());
    setup_audio(&mut sim.world);

    for tick in 0..cli.ticks {
        sim.tick(cli.dt, &input_at(&script, tick));
        if cli.json {
            match serde_json::to_string(&sim.snapshot()) {
                Ok(line) => println!("{}", line),
                Err(e) => log::error!("Failed to serialize snapshot: {}", e),
            }
        }
    }

    let status = sim.status().clone();
    log::info!(
        "after {} ticks: player health={} alive={} deaths={}, enemies {}/{} alive, won={}",
        cli.ticks,
        status.player_health,
        status.player_alive,
        status.player_deaths,
        status.enemies_alive,
        status.enemies_total,
        status.won
    );

    shutdown_audio(&mut sim.world);
}
