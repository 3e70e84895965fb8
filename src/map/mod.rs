//! Tiled map data
//!
//! A thin serde model of the Tiled JSON export. The simulation never reads this
//! directly during a tick; it is turned into a [`crate::sim::CityMap`] once at
//! load time and spawns are pulled out with the helpers in [`spawns`].

pub mod spawns;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use spawns::{CheckpointSpawn, TaxiSpawn, checkpoint_spawns, player_spawn, taxi_spawns};

/// Failures while loading a map. All of them are fatal for the race scene.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse map JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("map dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("tile size must be positive, got {width}x{height}")]
    InvalidTileSize { width: u32, height: u32 },
    #[error("layer '{layer}' has {actual} tiles, expected {expected}")]
    LayerSizeMismatch {
        layer: String,
        expected: usize,
        actual: usize,
    },
}

/// Layer types in a Tiled export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    #[default]
    TileLayer,
    Group,
    ObjectGroup,
    #[serde(other)]
    Other,
}

/// A custom property attached to a map object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// An object placed on an object layer (spawn points live here)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapObject {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl MapObject {
    /// String property by name, if present and a string
    pub fn string_property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.value.as_str())
    }
}

/// A layer: tiles, a group of layers, or objects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: LayerKind,
    /// Tile IDs, row-major (tile layers only, 0 = empty)
    #[serde(default)]
    pub data: Vec<u32>,
    /// Child layers (groups only)
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Objects (object groups only)
    #[serde(default)]
    pub objects: Vec<MapObject>,
}

fn default_visible() -> bool {
    true
}

impl Layer {
    /// Tile layer with the given row-major data
    pub fn tiles(name: &str, data: Vec<u32>) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            kind: LayerKind::TileLayer,
            data,
            layers: Vec::new(),
            visible: true,
            objects: Vec::new(),
        }
    }

    /// Object layer holding the given objects
    pub fn objects(name: &str, objects: Vec<MapObject>) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            kind: LayerKind::ObjectGroup,
            data: Vec::new(),
            layers: Vec::new(),
            visible: true,
            objects,
        }
    }

    /// Group layer wrapping children
    pub fn group(name: &str, layers: Vec<Layer>) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            kind: LayerKind::Group,
            data: Vec::new(),
            layers,
            visible: true,
            objects: Vec::new(),
        }
    }
}

/// A parsed Tiled map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    #[serde(rename = "tilewidth")]
    pub tile_width: u32,
    #[serde(rename = "tileheight")]
    pub tile_height: u32,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl TileMap {
    /// Parse and validate a map from Tiled JSON
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let map: TileMap = serde_json::from_str(json)?;
        map.validate()?;
        Ok(map)
    }

    /// Read, parse and validate a map file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::from_json(&json)?;
        log::info!(
            "Loaded map {}: {}x{} tiles ({}x{} px), {} top-level layers",
            path.display(),
            map.width,
            map.height,
            map.tile_width,
            map.tile_height,
            map.layers.len()
        );
        Ok(map)
    }

    /// Check dimensions and that every tile layer covers the whole map
    pub fn validate(&self) -> Result<(), MapError> {
        if self.width == 0 || self.height == 0 {
            return Err(MapError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(MapError::InvalidTileSize {
                width: self.tile_width,
                height: self.tile_height,
            });
        }
        let expected = self.tile_count();
        validate_layers(&self.layers, expected)
    }

    /// Number of cells in the map
    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// First non-empty tile layer with this exact name, searching groups
    pub fn find_tile_layer(&self, name: &str) -> Option<&Layer> {
        find_tile_layer(&self.layers, name)
    }
}

fn validate_layers(layers: &[Layer], expected: usize) -> Result<(), MapError> {
    for layer in layers {
        match layer.kind {
            LayerKind::TileLayer if !layer.data.is_empty() && layer.data.len() != expected => {
                return Err(MapError::LayerSizeMismatch {
                    layer: layer.name.clone(),
                    expected,
                    actual: layer.data.len(),
                });
            }
            LayerKind::Group => validate_layers(&layer.layers, expected)?,
            _ => {}
        }
    }
    Ok(())
}

fn find_tile_layer<'a>(layers: &'a [Layer], name: &str) -> Option<&'a Layer> {
    for layer in layers {
        if layer.kind == LayerKind::TileLayer && layer.name == name && !layer.data.is_empty() {
            return Some(layer);
        }
        if layer.kind == LayerKind::Group {
            if let Some(found) = find_tile_layer(&layer.layers, name) {
                return Some(found);
            }
        }
    }
    None
}

/// Whether a layer name marks it as a collision layer (case-insensitive substring)
pub fn is_collide_layer(name: &str, marker: &str) -> bool {
    name.to_uppercase().contains(&marker.to_uppercase())
}
