//! The player's bike messenger
//!
//! Riding has momentum (acceleration plus friction decay), walking sets the
//! velocity straight from input. A taxi hit costs health and knocks the player
//! clear of the taxi; at zero health the player is hospitalized for the rest
//! of the race.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::{Direction, Rect};
use super::spatial::SpatialQuery;

/// Player hitbox (world pixels)
pub const PLAYER_SIZE: Vec2 = Vec2::new(18.0, 18.0);
pub const MAX_HEALTH: u8 = 100;
/// Health lost per taxi hit
pub const TAXI_DAMAGE: u8 = 25;
/// Ticks of immunity after a hit
pub const INVUL_FRAMES: u32 = 45;
pub const STARTING_CASH: u32 = 100;

const ACCEL: f32 = 0.2;
const FRICTION: f32 = 0.92;
const WALK_SPEED: f32 = 1.2;
/// Mounting or dismounting is only allowed below this speed
const MOUNT_SPEED_LIMIT: f32 = 0.8;
const KICKBACK: f32 = 1.5;
const EJECT_DISTANCE: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Riding,
    Walking,
    /// Out of the race until it restarts
    Hospitalized,
}

/// Per-tick controls for the player
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// Steering, each component in [-1, 1]
    pub axis: Vec2,
    /// Cycle the riding axis (Right -> Down -> Left -> Up)
    pub toggle_axis: bool,
    /// Get on or off the bike
    pub toggle_mount: bool,
}

/// What a taxi hit did to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Invulnerable or already hospitalized
    Ignored,
    Damaged { health: u8 },
    Hospitalized,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub state: PlayerState,
    pub facing: Direction,
    /// Always within 0..=MAX_HEALTH
    pub health: u8,
    pub invul_frames: u32,
    pub cash: u32,
    /// Sprite frame (derived from state, never read by the simulation)
    pub frame: u32,
    pub frame_tick: u32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size: PLAYER_SIZE,
            state: PlayerState::Riding,
            facing: Direction::Right,
            health: MAX_HEALTH,
            invul_frames: 0,
            cash: STARTING_CASH,
            frame: 0,
            frame_tick: 0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn is_hospitalized(&self) -> bool {
        self.state == PlayerState::Hospitalized
    }

    /// Health as a 0.0-1.0 fraction for the HUD
    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / MAX_HEALTH as f32
    }

    /// Turn this tick's input into state, facing and velocity
    pub fn update_input(&mut self, input: &PlayerInput) {
        if self.is_hospitalized() {
            self.vel = Vec2::ZERO;
            return;
        }

        self.invul_frames = self.invul_frames.saturating_sub(1);

        if input.toggle_mount && self.vel.length() < MOUNT_SPEED_LIMIT {
            self.state = match self.state {
                PlayerState::Riding => PlayerState::Walking,
                _ => PlayerState::Riding,
            };
        }

        if input.toggle_axis && self.state == PlayerState::Riding {
            self.facing = self.facing.rotate_axis();
        }

        self.update_facing(input.axis);

        let moving = input.axis != Vec2::ZERO;
        match self.state {
            PlayerState::Riding => {
                self.vel += input.axis * ACCEL;
                self.vel *= FRICTION;
            }
            _ => {
                self.vel = if moving { input.axis * WALK_SPEED } else { Vec2::ZERO };
            }
        }

        self.update_animation(moving);
    }

    /// Riding keeps the facing on its current axis and only flips its sign;
    /// walking follows horizontal input.
    fn update_facing(&mut self, axis: Vec2) {
        if self.state == PlayerState::Riding && !self.facing.is_horizontal() {
            if axis.y < 0.0 {
                self.facing = Direction::Up;
            } else if axis.y > 0.0 {
                self.facing = Direction::Down;
            }
        } else if axis.x < 0.0 {
            self.facing = Direction::Left;
        } else if axis.x > 0.0 {
            self.facing = Direction::Right;
        }
    }

    /// React to a taxi overlap. `taxi_center` decides which way to eject.
    pub fn on_taxi_hit(&mut self, taxi_center: Vec2, city: &impl SpatialQuery) -> HitOutcome {
        if self.is_hospitalized() || self.invul_frames > 0 {
            return HitOutcome::Ignored;
        }

        // Kickback
        self.vel = -self.vel * KICKBACK;

        // Eject away from the taxi, one axis at a time, never into a wall
        let center = self.center();
        let dir_x = if center.x < taxi_center.x { -1.0 } else { 1.0 };
        let dir_y = if center.y < taxi_center.y { -1.0 } else { 1.0 };

        let step_x = Vec2::new(dir_x * EJECT_DISTANCE, 0.0);
        if !city.rect_hits_solid(&self.bounds().translate(step_x)) {
            self.pos += step_x;
        }
        let step_y = Vec2::new(0.0, dir_y * EJECT_DISTANCE);
        if !city.rect_hits_solid(&self.bounds().translate(step_y)) {
            self.pos += step_y;
        }

        self.health = self.health.saturating_sub(TAXI_DAMAGE);
        if self.health == 0 {
            self.state = PlayerState::Hospitalized;
            self.vel = Vec2::ZERO;
            HitOutcome::Hospitalized
        } else {
            self.invul_frames = INVUL_FRAMES;
            HitOutcome::Damaged {
                health: self.health,
            }
        }
    }

    fn update_animation(&mut self, moving: bool) {
        self.frame_tick = self.frame_tick.wrapping_add(1);
        match (self.state, moving) {
            (PlayerState::Hospitalized, _) => self.frame = 14,
            (PlayerState::Riding, true) => {
                if self.frame_tick % 8 == 0 {
                    let phase = (self.frame_tick / 8) % 2;
                    self.frame = if self.facing.is_horizontal() {
                        (self.frame + 1) % 3
                    } else if self.vel.y < 0.0 {
                        4 + phase
                    } else {
                        6 + phase
                    };
                }
            }
            (PlayerState::Riding, false) => {
                self.frame = match self.facing {
                    Direction::Up => 4,
                    Direction::Down => 6,
                    _ => 3,
                };
            }
            (PlayerState::Walking, true) => {
                if self.frame_tick % 10 == 0 {
                    self.frame = 9 + (self.frame_tick / 10) % 4;
                }
            }
            (PlayerState::Walking, false) => self.frame = 8,
        }
    }
}
