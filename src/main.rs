//! Alley Cat headless runner
//!
//! Loads a Tiled map, lets an autopilot ride the player through its manifest
//! and prints the final standings as JSON.
//!
//! Usage: `alley-cat <MAP> [--config <PATH>] [--ticks <N>] [--seed <N>]`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;

use alley_cat::audio::{LogAudio, dispatch_audio};
use alley_cat::consts::*;
use alley_cat::sim::{PlayerInput, RacePhase, RaceState, TickInput, tick};
use alley_cat::{SimConfig, TileMap};

/// Three minutes of race time
const DEFAULT_TICKS: u64 = 180 * TICK_RATE as u64;
const DEFAULT_SEED: u64 = 1999;

/// Alley Cat headless race runner
#[derive(Parser, Debug)]
#[command(name = "alley-cat")]
#[command(about = "Run a headless Alley Cat race and print the standings")]
#[command(version)]
struct Args {
    /// Tiled JSON map to race on
    map: PathBuf,

    /// Simulation config (JSON); missing or invalid files fall back to defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of ticks to simulate
    #[arg(short, long, default_value_t = DEFAULT_TICKS)]
    ticks: u64,

    /// RNG seed for the race
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

/// Race instance driven by the fixed-step loop
struct Runner {
    state: RaceState,
    audio: LogAudio,
    accumulator: f32,
    input: TickInput,
}

impl Runner {
    fn new(state: RaceState) -> Self {
        Self {
            state,
            audio: LogAudio::new(),
            accumulator: 0.0,
            input: TickInput::default(),
        }
    }

    /// Run as many simulation ticks as `dt` covers
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.input.player = autopilot(&self.state);
            tick(&mut self.state, &self.input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // One-shot inputs
            self.input.pause = false;

            let events = self.state.drain_events();
            dispatch_audio(&events, &mut self.audio);
        }
    }
}

/// Steer straight at the nearest open delivery, then at the finish line
fn autopilot(state: &RaceState) -> PlayerInput {
    let center = state.camera_focus();
    let manifest = &state.manifest;
    let target = manifest
        .checkpoints
        .iter()
        .filter(|cp| !cp.complete && !cp.finish_line)
        .min_by(|a, b| a.pos.distance(center).total_cmp(&b.pos.distance(center)))
        .or_else(|| manifest.finish_line());

    let axis = target
        .map(|cp| (cp.pos - center).normalize_or_zero())
        .unwrap_or(Vec2::ZERO);
    PlayerInput {
        axis,
        ..Default::default()
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let Args {
        map,
        config,
        ticks,
        seed,
    } = Args::parse();
    let config = config
        .map(SimConfig::load_or_default)
        .unwrap_or_default();

    log::info!("Alley Cat starting (seed {seed}, {ticks} ticks)");

    let state = match TileMap::load(&map).and_then(|map| RaceState::new(&map, config, seed)) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{e}");
            eprintln!("alley-cat: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut runner = Runner::new(state);
    for _ in 0..ticks {
        runner.update(SIM_DT);
        if runner.state.phase.is_terminal() {
            break;
        }
    }

    let hud = runner.state.hud();
    log::info!(
        "Race over: {:?} after {:.1}s, health {:.0}%, cash ${}, {}/{} checkpoints",
        hud.phase,
        hud.elapsed_secs,
        hud.health_fraction * 100.0,
        hud.cash,
        hud.checkpoints_completed,
        hud.checkpoints_total
    );
    if hud.phase == RacePhase::GameOver {
        log::info!("Hospitalized. Better luck next time.");
    }

    match serde_json::to_string_pretty(&runner.state.standings()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("alley-cat: failed to encode standings: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["alley-cat", "city.json"]).unwrap();
        assert_eq!(args.map, PathBuf::from("city.json"));
        assert_eq!(args.config, None);
        assert_eq!(args.ticks, 10_800);
        assert_eq!(args.seed, 1999);
    }

    #[test]
    fn test_args_options() {
        let args = Args::try_parse_from([
            "alley-cat", "city.json", "--config", "race.json", "--ticks", "30", "--seed", "7",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("race.json")));
        assert_eq!(args.ticks, 30);
        assert_eq!(args.seed, 7);
    }

    #[test]
    fn test_bad_numbers_are_rejected() {
        assert!(Args::try_parse_from(["alley-cat", "city.json", "--ticks", "5O"]).is_err());
        assert!(Args::try_parse_from(["alley-cat", "city.json", "--seed", "-1"]).is_err());
        // A bare number is not taken as a config path
        assert!(Args::try_parse_from(["alley-cat", "city.json", "30"]).is_err());
    }

    #[test]
    fn test_map_is_required() {
        assert!(Args::try_parse_from(["alley-cat"]).is_err());
    }

    #[test]
    fn test_args_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
