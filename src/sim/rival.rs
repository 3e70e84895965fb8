//! Rival bikers
//!
//! Each rival rides its own shuffled order of deliveries, then heads for the
//! finish line. Steering is a Manhattan heuristic: ride the longer axis toward
//! the target, drift back onto the road, dodge nearby taxis and turn onto the
//! other axis when a wall is coming up. A rival that stops moving for three
//! seconds gets dropped onto the nearest road tile.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::collision::Collider;
use super::events::GameEvent;
use super::geom::{Direction, Rect};
use super::manifest::Manifest;
use super::spatial::SpatialQuery;
use super::taxi::Taxi;
use crate::consts::CHECKPOINT_RADIUS;

/// Name and sprite tint of every rival, in grid order
pub const ROSTER: [(&str, [f32; 3]); 4] = [
    ("Purple Haze", [0.8, 0.4, 1.0]),
    ("Blue Streak", [0.4, 0.4, 1.0]),
    ("Green Machine", [0.4, 1.0, 0.4]),
    ("Yellow Jacket", [1.0, 1.0, 0.4]),
];

pub const RIVAL_SIZE: Vec2 = Vec2::new(18.0, 18.0);
/// Horizontal spacing of the starting grid
const GRID_SPACING: f32 = 32.0;

/// Stay-on-road correction only applies further than this from the target
const ROAD_CHECK_DISTANCE: f32 = 64.0;
const ROAD_PROBES: [f32; 4] = [-32.0, 32.0, -64.0, 64.0];
const TAXI_AVOID_RADIUS: f32 = 60.0;
/// Ticks of movement the wall look-ahead covers
const LOOK_AHEAD_TICKS: f32 = 15.0;
const SLIDE_PROBE: f32 = 2.0;
const SLIDE_NUDGE: f32 = 0.3;

const STUCK_EPSILON: f32 = 0.05;
pub const STUCK_LIMIT: u32 = 180;
const TAXI_STUCK_PENALTY: u32 = 10;
const RESPAWN_RING_STEP: f32 = 32.0;
const RESPAWN_MAX_RADIUS: f32 = 400.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RivalBiker {
    pub name: String,
    pub tint: [f32; 3],
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub speed: f32,
    /// Delivery names in the order this rival rides them
    pub route: Vec<String>,
    /// Checkpoints already visited
    pub inventory: BTreeSet<String>,
    /// Index into the manifest
    pub target: Option<usize>,
    pub stuck_timer: u32,
    pub last_pos: Vec2,
    /// Ticks to wait on the grid before riding
    pub start_delay: u32,
    pub ticks: u32,
    pub finished: bool,
    /// Race time in seconds when the finish line was reached
    pub finish_time: Option<f32>,
    pub facing: Direction,
    pub frame: u32,
    pub anim_offset: u32,
}

impl RivalBiker {
    pub fn new(
        name: &str,
        tint: [f32; 3],
        pos: Vec2,
        deliveries: &[String],
        rng: &mut impl Rng,
    ) -> Self {
        let mut route = deliveries.to_vec();
        route.shuffle(rng);
        Self {
            name: name.to_string(),
            tint,
            pos,
            size: RIVAL_SIZE,
            vel: Vec2::ZERO,
            speed: 1.5 + rng.random::<f32>() * 0.3,
            route,
            inventory: BTreeSet::new(),
            target: None,
            stuck_timer: 0,
            last_pos: pos,
            start_delay: 30 + rng.random_range(0..90),
            ticks: 0,
            finished: false,
            finish_time: None,
            facing: Direction::Right,
            frame: 0,
            anim_offset: rng.random_range(0..60),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Advance one tick. Returns true on the tick the rival finishes.
    pub fn update(
        &mut self,
        manifest: &Manifest,
        taxis: &[Taxi],
        city: &impl SpatialQuery,
        race_time: f32,
    ) -> bool {
        if self.finished {
            return false;
        }
        self.ticks += 1;
        if self.ticks < self.start_delay {
            return false;
        }

        self.find_target(manifest);
        self.steer(manifest, taxis, city);
        self.apply_velocity(city);

        let moved = (self.pos.x - self.last_pos.x).abs() + (self.pos.y - self.last_pos.y).abs();
        if moved < STUCK_EPSILON {
            self.stuck_timer += 1;
        } else {
            self.stuck_timer = 0;
        }
        self.last_pos = self.pos;
        if self.stuck_timer > STUCK_LIMIT {
            self.respawn_on_road(city);
        }

        self.update_animation();
        self.check_checkpoint(manifest, race_time)
    }

    /// First unvisited stop on the route, else the finish line
    pub fn find_target(&mut self, manifest: &Manifest) {
        let next = self
            .route
            .iter()
            .filter(|name| !self.inventory.contains(*name))
            .find_map(|name| manifest.checkpoints.iter().position(|cp| &cp.name == name));
        self.target = next.or_else(|| manifest.checkpoints.iter().position(|cp| cp.finish_line));
    }

    fn steer(&mut self, manifest: &Manifest, taxis: &[Taxi], city: &impl SpatialQuery) {
        let Some(target) = self.target.and_then(|i| manifest.checkpoints.get(i)) else {
            self.vel = Vec2::ZERO;
            return;
        };
        let d = target.pos - self.pos;
        let speed = self.speed;
        let toward = |delta: f32| if delta < 0.0 { -speed } else { speed };

        let mut mv = if d.x.abs() > d.y.abs() {
            Vec2::new(toward(d.x), 0.0)
        } else {
            Vec2::new(0.0, toward(d.y))
        };

        // Drift back onto the road, probing across the direction of travel
        if d.length() > ROAD_CHECK_DISTANCE && !city.is_road(self.pos + self.size * 0.5) {
            let vertical = mv.y != 0.0;
            for off in ROAD_PROBES {
                let probe = if vertical {
                    self.pos + Vec2::new(off, 0.0)
                } else {
                    self.pos + Vec2::new(0.0, off)
                };
                if city.is_road(probe) {
                    if vertical {
                        mv.x = toward(off);
                    } else {
                        mv.y = toward(off);
                    }
                    break;
                }
            }
        }

        for taxi in taxis {
            if self.pos.distance(taxi.pos) < TAXI_AVOID_RADIUS {
                if mv.x != 0.0 {
                    mv.y = if taxi.pos.y > self.pos.y { -speed } else { speed };
                } else {
                    mv.x = if taxi.pos.x > self.pos.x { -speed } else { speed };
                }
            }
        }

        if self.would_collide_at(self.pos + mv * LOOK_AHEAD_TICKS, city) {
            mv = if mv.x != 0.0 {
                Vec2::new(0.0, toward(d.y))
            } else {
                Vec2::new(toward(d.x), 0.0)
            };
        }

        self.vel = mv;
    }

    /// Axis-separated move; a blocked axis reverts and slides a little on the other
    fn apply_velocity(&mut self, city: &impl SpatialQuery) {
        let old = self.pos;

        self.pos.x += self.vel.x;
        if self.would_collide_at(self.pos, city) {
            self.pos.x = old.x;
            if !self.would_collide_at(self.pos + Vec2::new(0.0, SLIDE_PROBE), city) {
                self.pos.y += SLIDE_NUDGE;
            }
        }

        self.pos.y += self.vel.y;
        if self.would_collide_at(self.pos, city) {
            self.pos.y = old.y;
            if !self.would_collide_at(self.pos + Vec2::new(SLIDE_PROBE, 0.0), city) {
                self.pos.x += SLIDE_NUDGE;
            }
        }
    }

    /// Corners and center of the hitbox placed at `pos`
    pub fn would_collide_at(&self, pos: Vec2, city: &impl SpatialQuery) -> bool {
        let (w, h) = (self.size.x, self.size.y);
        [
            pos,
            pos + Vec2::new(w, 0.0),
            pos + Vec2::new(0.0, h),
            pos + Vec2::new(w, h),
            pos + Vec2::new(w * 0.5, h * 0.5),
        ]
        .into_iter()
        .any(|p| city.is_solid(p))
    }

    /// Search rings around the rival for a clear road spot. The stuck timer
    /// resets whether or not one is found.
    pub fn respawn_on_road(&mut self, city: &impl SpatialQuery) {
        self.stuck_timer = 0;
        let mut radius = RESPAWN_RING_STEP;
        while radius < RESPAWN_MAX_RADIUS {
            for step in 0..8 {
                let angle = step as f32 * std::f32::consts::FRAC_PI_4;
                let candidate = self.pos + Vec2::new(angle.cos(), angle.sin()) * radius;
                if !self.would_collide_at(candidate, city) && city.is_road(candidate) {
                    log::debug!("{} was stuck, moved to {:?}", self.name, candidate);
                    self.pos = candidate;
                    self.last_pos = candidate;
                    return;
                }
            }
            radius += RESPAWN_RING_STEP;
        }
        log::debug!("{} is stuck with no road in reach", self.name);
    }

    fn update_animation(&mut self) {
        if self.vel == Vec2::ZERO {
            self.frame = 0;
            return;
        }
        self.facing = if self.vel.x.abs() > self.vel.y.abs() {
            if self.vel.x > 0.0 { Direction::Right } else { Direction::Left }
        } else if self.vel.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        if (self.ticks + self.anim_offset) % 12 == 0 {
            self.frame = (self.frame + 1) % 3;
        }
    }

    fn check_checkpoint(&mut self, manifest: &Manifest, race_time: f32) -> bool {
        let Some(target) = self.target.and_then(|i| manifest.checkpoints.get(i)) else {
            return false;
        };
        if self.pos.distance(target.pos) >= CHECKPOINT_RADIUS {
            return false;
        }
        self.inventory.insert(target.name.clone());
        if target.finish_line {
            self.finished = true;
            self.finish_time = Some(race_time);
            self.vel = Vec2::ZERO;
            return true;
        }
        false
    }

    /// Collision callback: taxis knock rivals back hard, bikers softly
    pub fn on_collision(&mut self, other: Collider) {
        match other {
            Collider::Taxi { .. } => {
                self.vel *= -1.5;
                self.stuck_timer += TAXI_STUCK_PENALTY;
            }
            Collider::Player | Collider::Rival => {
                self.vel *= -0.5;
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RivalPack {
    pub rivals: Vec<RivalBiker>,
}

impl RivalPack {
    /// Line the roster up beside `start`, each with its own route
    pub fn new(start: Vec2, manifest: &Manifest, rng: &mut impl Rng) -> Self {
        let deliveries = manifest.delivery_names();
        let rivals = ROSTER
            .iter()
            .enumerate()
            .map(|(i, (name, tint))| {
                let pos = start + Vec2::new(i as f32 * GRID_SPACING, 0.0);
                RivalBiker::new(name, *tint, pos, &deliveries, rng)
            })
            .collect();
        Self { rivals }
    }

    pub fn update(
        &mut self,
        manifest: &Manifest,
        taxis: &[Taxi],
        city: &impl SpatialQuery,
        race_time: f32,
        events: &mut Vec<GameEvent>,
    ) {
        for rival in &mut self.rivals {
            if rival.update(manifest, taxis, city, race_time) {
                log::info!("{} finished in {:.1}s", rival.name, race_time);
                events.push(GameEvent::RivalFinished {
                    name: rival.name.clone(),
                    time_secs: race_time,
                });
            }
        }
    }

    pub fn finished_count(&self) -> usize {
        self.rivals.iter().filter(|r| r.finished).count()
    }
}
