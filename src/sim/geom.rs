//! Axis-aligned geometry shared by every actor
//!
//! World coordinates are pixels with +y pointing down (screen space).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One of the four cardinal facings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Down,
    Up,
    Left,
    #[default]
    Right,
}

impl Direction {
    /// Parse a Tiled `direction` property ("UP", "left", ...)
    pub fn from_tiled(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DOWN" => Some(Direction::Down),
            "UP" => Some(Direction::Up),
            "LEFT" => Some(Direction::Left),
            "RIGHT" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit step in world space
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Down => Vec2::Y,
            Direction::Up => Vec2::NEG_Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Next facing in the riding rotation: Right -> Down -> Left -> Up -> Right
    pub fn rotate_axis(self) -> Self {
        match self {
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
            Direction::Up => Direction::Right,
        }
    }
}

/// Axis-aligned bounding rectangle (`min` inclusive, `max` exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Rectangle from a top-left corner and size
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap: touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Area shared with another rectangle (0 when disjoint)
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let lo = self.min.max(other.min);
        let hi = self.max.min(other.max);
        let extent = (hi - lo).max(Vec2::ZERO);
        extent.x * extent.y
    }

    pub fn translate(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}
