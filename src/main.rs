//! tempobot entry point.
//!
//! Runs a headless session of the beat-synchronized tile puzzle:
//!
//! 1. load `GameConfig` from the INI file (defaults when it does not exist)
//! 2. tick the runtime at a fixed rate until the menu is up
//! 3. press start, then keep ticking until the actor has fallen and the
//!    scoreboard shows, or the time budget runs out
//! 4. print a JSON report of the session
//!
//! Nobody places items in a headless run, so the actor walks the start
//! platform until a command takes it over the edge.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --seed 7 --seconds 30
//! ```

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info, warn};

use tempobot::components::flow::FlowState;
use tempobot::game::GameRuntime;
use tempobot::resources::gameconfig::GameConfig;

/// Headless tempobot session runner.
#[derive(Parser)]
#[command(version, about = "Beat-synchronized tile rhythm puzzle core, run headless.")]
struct Cli {
    /// INI configuration file. Defaults are used when it does not exist.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Simulated seconds to run before giving up.
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,

    /// Fixed tick rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seed for the weighted draws, overriding the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the effective configuration to PATH and exit.
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> tempobot::error::Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if config.config_path().exists() {
        config.load_from_file()?;
    } else {
        info!(
            "No config at {:?}, using defaults",
            config.config_path()
        );
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate()?;
    Ok(config)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    // Early-exit: write the effective config and quit
    if let Some(path) = &cli.write_config {
        config.config_path = path.clone();
        if let Err(e) = config.save_to_file() {
            error!("{e}");
            process::exit(1);
        }
        println!("Config written to {}", path.display());
        return;
    }

    if cli.fps == 0 {
        error!("--fps must be at least 1");
        process::exit(1);
    }
    let dt = 1.0 / cli.fps as f32;

    let mut runtime = GameRuntime::new(config);
    let max_ticks = (cli.seconds.max(0.0) * cli.fps as f32).ceil() as u64;
    let mut ticks = 0u64;

    // --------------- Boot to menu ---------------
    while runtime.flow_state() != Some(FlowState::Menu) && ticks < max_ticks {
        runtime.tick(dt);
        ticks += 1;
    }
    runtime.press_start();

    // --------------- Game ---------------
    while !runtime.run_finished() && ticks < max_ticks {
        runtime.tick(dt);
        ticks += 1;
    }
    if !runtime.run_finished() {
        warn!("Time budget of {}s ran out before the run ended", cli.seconds);
    }

    let report = runtime.report();
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!("Failed to serialize report: {e}");
            process::exit(1);
        }
    }
}
