//! Spatial query surface
//!
//! Everything the AI and movement code needs to know about the city goes
//! through [`SpatialQuery`], so tests can swap in a synthetic grid.

use std::collections::HashMap;

use glam::Vec2;

use super::geom::Rect;
use super::grid::CollisionGrid;
use crate::map::TileMap;
use crate::settings::SimConfig;

/// Read-only view of the city used by movement, collision and AI
pub trait SpatialQuery {
    /// World-space edge length of one tile
    fn tile_size(&self) -> f32;

    /// Whether a tile blocks movement (out of bounds: never)
    fn is_solid_tile(&self, tx: i32, ty: i32) -> bool;

    /// Tile ID on a named layer at a world point, 0 when empty, unknown or out of bounds
    fn tile_id_at(&self, pos: Vec2, layer: &str) -> u32;

    /// Whether a world point lies on drivable road
    fn is_road(&self, pos: Vec2) -> bool;

    /// Whether the tile under a world point is solid
    fn is_solid(&self, pos: Vec2) -> bool {
        let ts = self.tile_size();
        self.is_solid_tile((pos.x / ts).floor() as i32, (pos.y / ts).floor() as i32)
    }

    /// Whether any tile covered by a rectangle is solid.
    ///
    /// Coverage is pixel-inclusive: a rectangle ending exactly on a tile edge
    /// does not reach into the next tile.
    fn rect_hits_solid(&self, rect: &Rect) -> bool {
        covered_tiles(rect, self.tile_size()).any(|(tx, ty)| self.is_solid_tile(tx, ty))
    }

    /// Area of a rectangle that lies inside solid tiles
    fn solid_overlap(&self, rect: &Rect) -> f32 {
        let ts = self.tile_size();
        covered_tiles(rect, ts)
            .filter(|&(tx, ty)| self.is_solid_tile(tx, ty))
            .map(|(tx, ty)| {
                let tile = Rect::new(Vec2::new(tx as f32, ty as f32) * ts, Vec2::splat(ts));
                rect.intersection_area(&tile)
            })
            .sum()
    }
}

/// Tile coordinates spanned by a rectangle
fn covered_tiles(rect: &Rect, ts: f32) -> impl Iterator<Item = (i32, i32)> {
    let x0 = (rect.min.x / ts).floor() as i32;
    let y0 = (rect.min.y / ts).floor() as i32;
    let x1 = (((rect.max.x - 1.0) / ts).floor() as i32).max(x0);
    let y1 = (((rect.max.y - 1.0) / ts).floor() as i32).max(y0);
    (y0..=y1).flat_map(move |ty| (x0..=x1).map(move |tx| (tx, ty)))
}

impl SpatialQuery for CollisionGrid {
    fn tile_size(&self) -> f32 {
        CollisionGrid::tile_size(self)
    }

    fn is_solid_tile(&self, tx: i32, ty: i32) -> bool {
        CollisionGrid::is_solid_tile(self, tx, ty)
    }

    fn tile_id_at(&self, _pos: Vec2, _layer: &str) -> u32 {
        0
    }

    fn is_road(&self, _pos: Vec2) -> bool {
        false
    }
}

/// The loaded city: collision grid plus named tile layers
#[derive(Debug, Clone)]
pub struct CityMap {
    grid: CollisionGrid,
    layers: HashMap<String, Vec<u32>>,
    road_layer: String,
    road_tile_id: u32,
}

impl CityMap {
    /// Build from a validated map using the configured scale and layer names
    pub fn from_map(map: &TileMap, config: &SimConfig) -> Self {
        let tile_size = map.tile_width as f32 * config.map_scale;
        let grid = CollisionGrid::from_map(map, tile_size, &config.collide_marker);

        let mut layers = HashMap::new();
        match map.find_tile_layer(&config.road_layer) {
            Some(road) => {
                layers.insert(road.name.clone(), road.data.clone());
            }
            None => log::warn!(
                "Road layer '{}' not found; taxis cannot swerve and rivals cannot find roads",
                config.road_layer
            ),
        }

        Self {
            grid,
            layers,
            road_layer: config.road_layer.clone(),
            road_tile_id: config.road_tile_id,
        }
    }

    /// City from a collision grid and a road mask (`=` marks road), mostly for tests
    pub fn from_rows(solid: &[&str], roads: &[&str], tile_size: f32) -> Self {
        let grid = CollisionGrid::from_rows(solid, tile_size);
        let width = grid.width() as usize;
        let mut road = vec![0; width * grid.height() as usize];
        for (y, row) in roads.iter().enumerate().take(grid.height() as usize) {
            for (x, c) in row.chars().enumerate().take(width) {
                if c == '=' {
                    road[y * width + x] = crate::consts::ROAD_TILE_ID;
                }
            }
        }
        let mut layers = HashMap::new();
        layers.insert(crate::consts::ROAD_LAYER.to_string(), road);
        Self {
            grid,
            layers,
            road_layer: crate::consts::ROAD_LAYER.to_string(),
            road_tile_id: crate::consts::ROAD_TILE_ID,
        }
    }

    pub fn grid(&self) -> &CollisionGrid {
        &self.grid
    }

    /// World size in pixels
    pub fn world_size(&self) -> Vec2 {
        self.grid.world_size()
    }
}

impl SpatialQuery for CityMap {
    fn tile_size(&self) -> f32 {
        self.grid.tile_size()
    }

    fn is_solid_tile(&self, tx: i32, ty: i32) -> bool {
        self.grid.is_solid_tile(tx, ty)
    }

    fn tile_id_at(&self, pos: Vec2, layer: &str) -> u32 {
        let Some(data) = self.layers.get(layer) else {
            return 0;
        };
        let (tx, ty) = self.grid.tile_of(pos);
        if tx < 0 || ty < 0 || tx >= self.grid.width() as i32 || ty >= self.grid.height() as i32 {
            return 0;
        }
        let idx = ty as usize * self.grid.width() as usize + tx as usize;
        data.get(idx).copied().unwrap_or(0)
    }

    fn is_road(&self, pos: Vec2) -> bool {
        self.tile_id_at(pos, &self.road_layer) == self.road_tile_id
    }
}
