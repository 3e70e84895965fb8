//! Alley Cat - a top-down bike messenger race through a tile-based city
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (player physics, taxi and rival AI, collisions)
//! - `map`: Tiled map data consumed by the simulation
//! - `audio`: Sound cue dispatch to a host-provided sink
//! - `settings`: Simulation configuration
//! - `standings`: End-of-race results

pub mod audio;
pub mod map;
pub mod settings;
pub mod sim;
pub mod standings;

pub use map::{MapError, TileMap};
pub use settings::{ConfigError, SimConfig};
pub use standings::Standings;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World pixels per map pixel
    pub const DEFAULT_MAP_SCALE: f32 = 2.0;
    /// Tile layer whose tile IDs mark drivable road
    pub const ROAD_LAYER: &str = "Roads and Sidewalks";
    /// Tile ID on the road layer that counts as roadway
    pub const ROAD_TILE_ID: u32 = 2;
    /// Layer-name keyword marking collision layers
    pub const COLLIDE_MARKER: &str = "COLLIDE";
    /// Object layer holding checkpoint spawns
    pub const CHECKPOINT_LAYER: &str = "Spawns";

    /// Distance at which a checkpoint counts as reached (world pixels)
    pub const CHECKPOINT_RADIUS: f32 = 48.0;
}
