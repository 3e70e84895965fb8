//! Spawn point extraction from object layers
//!
//! Unlike collision building, spawn extraction skips invisible layers: hiding a
//! layer in the editor is how level designers switch spawns off.

use glam::Vec2;

use super::{Layer, LayerKind, MapObject, TileMap};
use crate::sim::Direction;

/// Where a taxi enters the world and which way it drives
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxiSpawn {
    /// Map-pixel position (unscaled)
    pub pos: Vec2,
    pub direction: Direction,
}

/// A candidate delivery location
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointSpawn {
    /// Location name shown to the player (unique within a manifest)
    pub name: String,
    /// Map-pixel position (unscaled)
    pub pos: Vec2,
}

fn walk_objects<'a>(layers: &'a [Layer], out: &mut Vec<(&'a Layer, &'a MapObject)>) {
    for layer in layers {
        if !layer.visible {
            continue;
        }
        match layer.kind {
            LayerKind::Group => walk_objects(&layer.layers, out),
            LayerKind::ObjectGroup => out.extend(layer.objects.iter().map(|o| (layer, o))),
            _ => {}
        }
    }
}

fn visible_objects(map: &TileMap) -> Vec<(&Layer, &MapObject)> {
    let mut out = Vec::new();
    walk_objects(&map.layers, &mut out);
    out
}

/// All objects named `taxi` on any visible object layer
pub fn taxi_spawns(map: &TileMap) -> Vec<TaxiSpawn> {
    visible_objects(map)
        .into_iter()
        .filter(|(_, obj)| obj.name == "taxi")
        .map(|(_, obj)| {
            let raw = obj.string_property("direction").unwrap_or("RIGHT");
            let direction = Direction::from_tiled(raw).unwrap_or_else(|| {
                log::warn!("Taxi spawn {} has unknown direction '{}', using RIGHT", obj.id, raw);
                Direction::Right
            });
            TaxiSpawn {
                pos: Vec2::new(obj.x, obj.y),
                direction,
            }
        })
        .collect()
}

/// Checkpoint candidates on the named object layer.
///
/// The location name comes from the `location` property; objects without one
/// fall back to their object name. Taxi and player markers are skipped.
pub fn checkpoint_spawns(map: &TileMap, layer_name: &str) -> Vec<CheckpointSpawn> {
    visible_objects(map)
        .into_iter()
        .filter(|(layer, obj)| layer.name == layer_name && obj.name != "taxi" && obj.name != "player")
        .filter_map(|(_, obj)| {
            let name = obj
                .string_property("location")
                .map(str::to_string)
                .or_else(|| (!obj.name.is_empty()).then(|| obj.name.clone()))?;
            Some(CheckpointSpawn {
                name,
                pos: Vec2::new(obj.x, obj.y),
            })
        })
        .collect()
}

/// Position of the first object named `player`, if any
pub fn player_spawn(map: &TileMap) -> Option<Vec2> {
    visible_objects(map)
        .into_iter()
        .find(|(_, obj)| obj.name == "player")
        .map(|(_, obj)| Vec2::new(obj.x, obj.y))
}
