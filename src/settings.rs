//! Simulation configuration
//!
//! Handed to the race driver once at construction and read-only afterwards.
//! Replaces the old process-wide debug and mobile switches.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Verbose gameplay logging (per-hit health lines, spawn summaries)
    pub debug: bool,
    /// Emit haptic pulses on hits (touch devices)
    pub haptics: bool,

    // === Map ===
    /// World pixels per map pixel
    pub map_scale: f32,
    /// Tile layer holding road tiles
    pub road_layer: String,
    /// Tile ID that counts as road on `road_layer`
    pub road_tile_id: u32,
    /// Keyword that marks a tile layer as collidable
    pub collide_marker: String,
    /// Object layer holding checkpoint spawns
    pub checkpoint_layer: String,

    // === Feedback ===
    /// Camera shake intensity applied when a taxi hits the player
    pub hit_shake: f32,
    /// Haptic pulse length in milliseconds
    pub haptic_duration_ms: u32,

    // === Economy ===
    /// Cash paid for each delivery
    pub checkpoint_fare: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            debug: false,
            haptics: false,

            map_scale: consts::DEFAULT_MAP_SCALE,
            road_layer: consts::ROAD_LAYER.to_string(),
            road_tile_id: consts::ROAD_TILE_ID,
            collide_marker: consts::COLLIDE_MARKER.to_string(),
            checkpoint_layer: consts::CHECKPOINT_LAYER.to_string(),

            hit_shake: 12.0,
            haptic_duration_ms: 50,

            checkpoint_fare: 20,
        }
    }
}

impl SimConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load a config file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded simulation config");
                config
            }
            Err(e) => {
                log::warn!("{e}; using default config");
                Self::default()
            }
        }
    }

    /// Haptic pulse length, if haptics are enabled
    pub fn effective_haptics(&self) -> Option<u32> {
        self.haptics.then_some(self.haptic_duration_ms)
    }
}
