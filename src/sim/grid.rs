//! Tile collision grid
//!
//! One boolean per map cell, built once per map load and immutable afterwards.
//! Queries outside the map are never solid, so actors near the edge are not
//! ejected by phantom walls.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::map::{Layer, LayerKind, TileMap, is_collide_layer};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionGrid {
    width: u32,
    height: u32,
    /// World-space edge length of one cell
    tile_size: f32,
    solid: Vec<bool>,
}

impl CollisionGrid {
    /// Empty (all open) grid
    pub fn new(width: u32, height: u32, tile_size: f32) -> Self {
        Self {
            width,
            height,
            tile_size,
            solid: vec![false; width as usize * height as usize],
        }
    }

    /// Build from every tile layer whose name carries the collision marker.
    ///
    /// Groups are recursed into. Layer visibility is ignored here: a hidden
    /// collision layer still blocks movement.
    pub fn from_map(map: &TileMap, tile_size: f32, marker: &str) -> Self {
        let mut grid = Self::new(map.width, map.height, tile_size);
        grid.mark_layers(&map.layers, marker);
        log::info!(
            "Collision grid {}x{}: {} solid cells",
            grid.width,
            grid.height,
            grid.solid_count()
        );
        grid
    }

    fn mark_layers(&mut self, layers: &[Layer], marker: &str) {
        for layer in layers {
            match layer.kind {
                LayerKind::Group => self.mark_layers(&layer.layers, marker),
                LayerKind::TileLayer if is_collide_layer(&layer.name, marker) => {
                    for (i, &gid) in layer.data.iter().enumerate() {
                        if gid != 0 && i < self.solid.len() {
                            self.solid[i] = true;
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Build from ASCII rows, `#` marks a solid cell
    pub fn from_rows(rows: &[&str], tile_size: f32) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut grid = Self::new(width, height, tile_size);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    grid.solid[y * width as usize + x] = true;
                }
            }
        }
        grid
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Size of the covered area in world pixels
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.tile_size
    }

    /// Solid flag for a cell; out-of-bounds cells are open
    pub fn is_solid_tile(&self, tx: i32, ty: i32) -> bool {
        if tx < 0 || ty < 0 || tx >= self.width as i32 || ty >= self.height as i32 {
            return false;
        }
        self.solid[ty as usize * self.width as usize + tx as usize]
    }

    /// Cell containing a world point (floor division)
    pub fn tile_of(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.tile_size).floor() as i32,
            (pos.y / self.tile_size).floor() as i32,
        )
    }

    pub fn solid_count(&self) -> usize {
        self.solid.iter().filter(|&&s| s).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_map_uses_collide_layers_only() {
        let mut hidden = Layer::tiles("Hidden COLLIDE", vec![0, 0, 0, 7]);
        hidden.visible = false;
        let map = TileMap {
            width: 2,
            height: 2,
            tile_width: 16,
            tile_height: 16,
            layers: vec![
                Layer::tiles("Ground", vec![1, 1, 1, 1]),
                Layer::group("Buildings", vec![Layer::tiles("Walls Collide", vec![0, 3, 0, 0])]),
                hidden,
            ],
        };
        let grid = CollisionGrid::from_map(&map, 32.0, "COLLIDE");
        assert!(!grid.is_solid_tile(0, 0));
        assert!(grid.is_solid_tile(1, 0));
        assert!(!grid.is_solid_tile(0, 1));
        // Invisible collision layers still block
        assert!(grid.is_solid_tile(1, 1));
        assert_eq!(grid.solid_count(), 2);
    }

    #[test]
    fn test_out_of_bounds_is_open() {
        let grid = CollisionGrid::from_rows(&["##", "##"], 32.0);
        assert!(grid.is_solid_tile(0, 0));
        assert!(!grid.is_solid_tile(-1, 0));
        assert!(!grid.is_solid_tile(0, 2));
        assert!(!grid.is_solid_tile(2, 0));
    }

    #[test]
    fn test_tile_of_floors() {
        let grid = CollisionGrid::new(4, 4, 32.0);
        assert_eq!(grid.tile_of(Vec2::new(31.9, 32.0)), (0, 1));
        assert_eq!(grid.tile_of(Vec2::new(-0.5, 0.0)), (-1, 0));
        assert_eq!(grid.world_size(), Vec2::splat(128.0));
    }
}
