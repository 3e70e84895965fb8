//! Race state
//!
//! Everything one race owns: the city, every actor, the manifest, the clock
//! and the seeded RNG. Built once per map load and rebuilt in place on restart.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::manifest::Manifest;
use super::player::Player;
use super::rival::RivalPack;
use super::spatial::CityMap;
use super::taxi::TaxiFleet;
use crate::consts::SIM_DT;
use crate::map::{self, MapError, TaxiSpawn, TileMap};
use crate::settings::SimConfig;
use crate::standings::Standings;

/// Number of client sprite variants to pick from
pub const CLIENT_VARIANTS: usize = 4;
/// Rivals line up this far below the player's start
pub const RIVAL_GRID_OFFSET: Vec2 = Vec2::new(0.0, 32.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    Racing,
    Paused,
    /// Player hospitalized
    GameOver,
    /// Player crossed the finish line
    Finished,
}

impl RacePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, RacePhase::GameOver | RacePhase::Finished)
    }
}

/// What the HUD shows each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub health_fraction: f32,
    pub cash: u32,
    pub checkpoints_completed: usize,
    pub checkpoints_total: usize,
    pub elapsed_secs: f32,
    pub rivals_finished: usize,
    pub phase: RacePhase,
}

/// Spawn data kept for restarts
#[derive(Debug, Clone)]
struct StartLine {
    player: Vec2,
    taxis: Vec<TaxiSpawn>,
}

#[derive(Debug, Clone)]
pub struct RaceState {
    pub seed: u64,
    pub config: SimConfig,
    pub city: CityMap,
    pub rng: Pcg32,
    pub phase: RacePhase,
    /// Ticks since the start
    pub time_ticks: u64,
    pub player: Player,
    /// Race time when the player finished
    pub player_finish_time: Option<f32>,
    pub taxis: TaxiFleet,
    pub rivals: RivalPack,
    pub manifest: Manifest,
    /// Camera shake intensity, decays every tick
    pub screen_shake: f32,
    pub(crate) events: Vec<GameEvent>,
    start: StartLine,
}

impl RaceState {
    /// Build a race from a loaded map. Invalid map data is fatal.
    pub fn new(map: &TileMap, config: SimConfig, seed: u64) -> Result<Self, MapError> {
        map.validate()?;

        let city = CityMap::from_map(map, &config);
        let scale = config.map_scale;
        let world = city.world_size();

        let player_start = match map::player_spawn(map) {
            Some(pos) => pos * scale,
            None => {
                log::warn!("Map has no player spawn; starting mid-map");
                world * 0.5
            }
        };

        let mut rng = Pcg32::seed_from_u64(seed);
        let checkpoints = map::checkpoint_spawns(map, &config.checkpoint_layer);
        let manifest = Manifest::generate(&checkpoints, scale, CLIENT_VARIANTS, world * 0.5, &mut rng);

        if config.debug {
            log::debug!(
                "City {}x{} tiles, {} solid, world {:?}",
                city.grid().width(),
                city.grid().height(),
                city.grid().solid_count(),
                world
            );
        }

        let start = StartLine {
            player: player_start,
            taxis: map::taxi_spawns(map),
        };

        let mut state = Self {
            seed,
            config,
            city,
            rng,
            phase: RacePhase::Racing,
            time_ticks: 0,
            player: Player::new(player_start),
            player_finish_time: None,
            taxis: TaxiFleet::default(),
            rivals: RivalPack::default(),
            manifest,
            screen_shake: 0.0,
            events: Vec::new(),
            start,
        };
        state.spawn_actors();
        Ok(state)
    }

    fn spawn_actors(&mut self) {
        let world = self.city.world_size();
        self.player = Player::new(self.start.player);
        self.player_finish_time = None;
        self.taxis = TaxiFleet::from_spawns(&self.start.taxis, self.config.map_scale, world, &mut self.rng);
        self.rivals = RivalPack::new(
            self.start.player + RIVAL_GRID_OFFSET,
            &self.manifest,
            &mut self.rng,
        );
        self.time_ticks = 0;
        self.screen_shake = 0.0;
        self.phase = RacePhase::Racing;
        self.events.push(GameEvent::RaceStarted);
        self.events.push(GameEvent::MusicStart);
    }

    /// Start over with the same manifest and spawns
    pub fn restart(&mut self) {
        log::info!("Restarting race");
        self.manifest.reset();
        self.spawn_actors();
    }

    pub fn race_time_secs(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            health_fraction: self.player.health_fraction(),
            cash: self.player.cash,
            checkpoints_completed: self.manifest.completed_count(),
            checkpoints_total: self.manifest.len(),
            elapsed_secs: self.race_time_secs(),
            rivals_finished: self.rivals.finished_count(),
            phase: self.phase,
        }
    }

    /// Point the camera should follow
    pub fn camera_focus(&self) -> Vec2 {
        self.player.center()
    }

    /// Hand this tick's side effects to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn standings(&self) -> Standings {
        Standings::new(self.player_finish_time, &self.rivals)
    }
}
