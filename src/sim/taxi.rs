//! Taxi traffic
//!
//! Each taxi drives one cardinal axis for its whole life. Speed eases toward a
//! target (braking harder than it accelerates), the target drops to zero when
//! something is in front, and crashes freeze the taxi for a while before it
//! pulls away again with a short grace period.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Collider;
use super::events::GameEvent;
use super::geom::{Direction, Rect};
use super::spatial::SpatialQuery;
use crate::consts::SIM_DT;
use crate::map::TaxiSpawn;

/// Sprite footprint before scaling (long side along the travel axis)
pub const TAXI_LENGTH: f32 = 32.0;
pub const TAXI_WIDTH: f32 = 16.0;

/// Player sensing cone (unscaled)
const PLAYER_LOOK_AHEAD: f32 = 55.0;
const PLAYER_LANE_WIDTH: f32 = 14.0;
/// Gap kept to the taxi in front (unscaled, bumper to bumper)
const FOLLOW_DISTANCE: f32 = 20.0;
const LANE_TOLERANCE: f32 = 8.0;
/// Sideways probe distance and per-tick nudge when swerving
const SWERVE_PROBE: f32 = 15.0;
const SWERVE_NUDGE: f32 = 0.6;

const BRAKE: f32 = 0.08;
const THROTTLE: f32 = 0.03;
const STOP_EPSILON: f32 = 0.05;

pub const SILENT_CRASH_SECS: f32 = 1.2;
pub const CRASH_MIN_SECS: f32 = 12.0;
pub const CRASH_JITTER_SECS: f32 = 5.0;
/// Grace period after waking from a crash
pub const RECOVERY_SECS: f32 = 2.5;
/// Grace period after re-entering the world
pub const RESPAWN_GRACE_SECS: f32 = 2.0;

/// How far past the world edge a taxi may drive before it wraps (unscaled)
const EXIT_BUFFER: f32 = 120.0;
const RESPAWN_BUFFER: f32 = 64.0;
const RESPAWN_JITTER: f32 = 15.0;

pub const CRASH_PARTICLES: usize = 12;
const PUFF_INTERVAL: u32 = 15;
pub const MAX_PARTICLES: usize = 256;

/// Coarse view of what a taxi is doing, derived from its timers and speeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxiPhase {
    Cruising,
    Braking,
    Crashed,
    Recovering,
}

/// How hard a taxi crashed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashKind {
    /// Bumped the player: short stop, no smoke
    Silent,
    /// Hit another vehicle: long stop with a smoke burst
    Full,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxi {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Current speed in px/tick, never negative
    pub speed: f32,
    pub base_speed: f32,
    pub target_speed: f32,
    pub direction: Direction,
    /// Spawn position; the perpendicular coordinate is the lane to return to
    pub lane: Vec2,
    pub crashed: bool,
    /// Seconds left frozen after a crash
    pub crash_timer: f32,
    /// Seconds of post-crash immunity
    pub recovery_timer: f32,
    pub has_honked: bool,
    /// Side tried first when swerving (+1 or -1)
    pub swerve_side: f32,
    pub scale: f32,
    pub frame: u32,
    pub frame_tick: u32,
}

impl Taxi {
    pub fn new(
        id: u32,
        pos: Vec2,
        base_speed: f32,
        direction: Direction,
        scale: f32,
        rng: &mut impl Rng,
    ) -> Self {
        let size = if direction.is_horizontal() {
            Vec2::new(TAXI_LENGTH, TAXI_WIDTH)
        } else {
            Vec2::new(TAXI_WIDTH, TAXI_LENGTH)
        } * scale;
        let speed = base_speed + rng.random::<f32>() * 0.5;
        Self {
            id,
            pos,
            size,
            speed,
            base_speed: speed,
            target_speed: speed,
            direction,
            lane: pos,
            crashed: false,
            crash_timer: 0.0,
            recovery_timer: 0.0,
            has_honked: false,
            swerve_side: 1.0,
            scale,
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

    pub fn is_recovering(&self) -> bool {
        self.recovery_timer > 0.0
    }

    pub fn phase(&self) -> TaxiPhase {
        if self.crashed {
            TaxiPhase::Crashed
        } else if self.is_recovering() {
            TaxiPhase::Recovering
        } else if self.speed > self.target_speed {
            TaxiPhase::Braking
        } else {
            TaxiPhase::Cruising
        }
    }

    /// Advance one tick. `blocked_by_taxi` comes from the fleet's sensing.
    /// Returns true if the taxi honked this tick.
    pub fn update(
        &mut self,
        blocked_by_taxi: bool,
        player_center: Vec2,
        world_size: Vec2,
        city: &impl SpatialQuery,
        rng: &mut impl Rng,
        particles: &mut ParticleSystem,
    ) -> bool {
        if self.crashed {
            self.update_crashed(rng, particles);
            return false;
        }

        self.recovery_timer = (self.recovery_timer - SIM_DT).max(0.0);

        let blocked_by_player = self.player_in_front(player_center);
        let mut honked = false;

        if blocked_by_taxi || blocked_by_player {
            self.target_speed = 0.0;
            if blocked_by_player && !self.has_honked {
                self.has_honked = true;
                honked = true;
            }
            if blocked_by_taxi && !blocked_by_player {
                self.swerve(city);
            }
        } else {
            self.target_speed = self.base_speed;
            self.has_honked = false;
        }

        self.integrate_speed();
        self.pos += self.direction.unit() * self.speed;

        self.frame_tick = self.frame_tick.wrapping_add(1);
        if self.frame_tick % 8 == 0 {
            self.frame = (self.frame + 1) % 3;
        }

        if self.is_out_of_bounds(world_size) {
            self.respawn(world_size, rng);
        }

        honked
    }

    fn update_crashed(&mut self, rng: &mut impl Rng, particles: &mut ParticleSystem) {
        self.crash_timer -= SIM_DT;
        self.frame_tick = self.frame_tick.wrapping_add(1);
        if self.crash_timer > 1.0 && self.frame_tick % PUFF_INTERVAL == 0 {
            let exhaust = self.pos + Vec2::new(self.size.x * 0.5, 0.0);
            particles.spawn(exhaust, 1, rng);
        }
        if self.crash_timer <= 0.0 {
            self.crashed = false;
            self.crash_timer = 0.0;
            self.speed = 0.0;
            self.target_speed = self.base_speed;
            self.recovery_timer = RECOVERY_SECS;
            log::debug!("Taxi {} back on the road", self.id);
        }
    }

    /// Ease toward the target: brake fast, accelerate slowly, never creep below zero
    fn integrate_speed(&mut self) {
        if self.speed > self.target_speed {
            self.speed = (self.speed - BRAKE).max(self.target_speed);
        } else if self.speed < self.target_speed {
            self.speed = (self.speed + THROTTLE).min(self.target_speed);
        }
        if self.target_speed == 0.0 && self.speed < STOP_EPSILON {
            self.speed = 0.0;
        }
        self.speed = self.speed.max(0.0);
    }

    /// Player inside the forward cone along the travel axis
    pub fn player_in_front(&self, player: Vec2) -> bool {
        let look_ahead = PLAYER_LOOK_AHEAD * self.scale;
        let lane_width = PLAYER_LANE_WIDTH * self.scale;
        let d = player - self.center();
        let (ahead, side) = match self.direction {
            Direction::Right => (d.x, d.y),
            Direction::Left => (-d.x, d.y),
            Direction::Down => (d.y, d.x),
            Direction::Up => (-d.y, d.x),
        };
        ahead > 0.0 && ahead < look_ahead && side.abs() < lane_width
    }

    /// Nudge sideways toward a drivable neighbouring lane. The preferred side
    /// flips whenever it is not drivable.
    fn swerve(&mut self, city: &impl SpatialQuery) {
        let probe = SWERVE_PROBE * self.scale;
        let perp = if self.direction.is_horizontal() {
            Vec2::Y
        } else {
            Vec2::X
        };
        for _ in 0..2 {
            if city.is_road(self.pos + perp * probe * self.swerve_side) {
                self.pos += perp * SWERVE_NUDGE * self.swerve_side;
                return;
            }
            self.swerve_side = -self.swerve_side;
        }
    }

    fn is_out_of_bounds(&self, world: Vec2) -> bool {
        let buffer = EXIT_BUFFER * self.scale;
        match self.direction {
            Direction::Right => self.pos.x > world.x + buffer,
            Direction::Left => self.pos.x < -buffer,
            Direction::Up => self.pos.y < -buffer,
            Direction::Down => self.pos.y > world.y + buffer,
        }
    }

    /// Re-enter from the opposite edge on the original lane with a fresh speed
    pub fn respawn(&mut self, world: Vec2, rng: &mut impl Rng) {
        self.crashed = false;
        self.recovery_timer = RESPAWN_GRACE_SECS;
        let buffer = RESPAWN_BUFFER * self.scale;

        self.pos = match self.direction {
            Direction::Right => Vec2::new(-buffer, self.lane.y),
            Direction::Left => Vec2::new(world.x + buffer, self.lane.y),
            Direction::Up => Vec2::new(self.lane.x, world.y + buffer),
            Direction::Down => Vec2::new(self.lane.x, -buffer),
        };
        self.pos += Vec2::new(
            (rng.random::<f32>() - 0.5) * RESPAWN_JITTER,
            (rng.random::<f32>() - 0.5) * RESPAWN_JITTER,
        );

        let speed = 1.0 + rng.random::<f32>() * 1.5;
        self.base_speed = speed;
        self.target_speed = speed;
        self.speed = speed;
        log::debug!("Taxi {} respawned at {:?} ({:.2} px/tick)", self.id, self.pos, speed);
    }

    /// Long crash with a smoke burst. No-op while crashed or recovering.
    pub fn crash(&mut self, rng: &mut impl Rng, particles: &mut ParticleSystem) -> bool {
        if self.crashed || self.is_recovering() {
            return false;
        }
        self.crashed = true;
        self.crash_timer = CRASH_MIN_SECS + rng.random::<f32>() * CRASH_JITTER_SECS;
        self.speed = 0.0;
        particles.spawn(self.center(), CRASH_PARTICLES, rng);
        log::debug!("Taxi {} crashed for {:.1}s", self.id, self.crash_timer);
        true
    }

    /// Short stop after bumping the player
    pub fn silent_crash(&mut self) -> bool {
        if self.crashed || self.is_recovering() {
            return false;
        }
        self.crashed = true;
        self.crash_timer = SILENT_CRASH_SECS;
        self.speed = 0.0;
        true
    }

    /// Collision callback
    pub fn on_collision(
        &mut self,
        other: Collider,
        rng: &mut impl Rng,
        particles: &mut ParticleSystem,
    ) -> Option<CrashKind> {
        if self.crashed || self.is_recovering() {
            return None;
        }
        match other {
            Collider::Player => self.silent_crash().then_some(CrashKind::Silent),
            Collider::Taxi { recovering: true } => None,
            Collider::Taxi { .. } | Collider::Rival => {
                self.crash(rng, particles).then_some(CrashKind::Full)
            }
        }
    }
}

/// A puff of crash smoke (visual only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, removed at 0
    pub life: f32,
    pub angle: f32,
    pub rot_vel: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn spawn(&mut self, pos: Vec2, count: usize, rng: &mut impl Rng) {
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(rng.random_range(-1.2..1.2), rng.random_range(-2.0..-0.4)),
                life: 1.0,
                angle: rng.random::<f32>() * std::f32::consts::TAU,
                rot_vel: rng.random_range(-0.08..0.08),
            });
        }
    }

    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel.y -= 0.02;
            p.angle += p.rot_vel;
            p.life -= 0.015;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Every taxi in the city plus their shared smoke
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxiFleet {
    pub taxis: Vec<Taxi>,
    pub particles: ParticleSystem,
    pub world_size: Vec2,
    pub scale: f32,
}

impl TaxiFleet {
    /// One taxi per map spawn. Spawn positions are in map pixels.
    pub fn from_spawns(
        spawns: &[TaxiSpawn],
        scale: f32,
        world_size: Vec2,
        rng: &mut impl Rng,
    ) -> Self {
        let taxis = spawns
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let base = 1.0 + (s.pos.x + s.pos.y).rem_euclid(0.5);
                Taxi::new(i as u32, s.pos * scale, base, s.direction, scale, rng)
            })
            .collect::<Vec<_>>();
        log::info!("Spawned {} taxis", taxis.len());
        Self {
            taxis,
            particles: ParticleSystem::default(),
            world_size,
            scale,
        }
    }

    /// Another live taxi in the same lane, ahead and within following distance
    pub fn taxi_in_front(&self, idx: usize) -> bool {
        let Some(t) = self.taxis.get(idx) else {
            return false;
        };
        let buffer = FOLLOW_DISTANCE * self.scale;
        let tolerance = LANE_TOLERANCE * self.scale;
        let (me, me_center) = (t.bounds(), t.center());

        self.taxis.iter().enumerate().any(|(j, other)| {
            if j == idx || other.crashed {
                return false;
            }
            let them = other.bounds();
            let oc = other.center();
            match t.direction {
                Direction::Right => {
                    (oc.y - me_center.y).abs() < tolerance
                        && them.min.x > me.min.x
                        && them.min.x - me.max.x < buffer
                }
                Direction::Left => {
                    (oc.y - me_center.y).abs() < tolerance
                        && them.max.x < me.max.x
                        && me.min.x - them.max.x < buffer
                }
                Direction::Down => {
                    (oc.x - me_center.x).abs() < tolerance
                        && them.min.y > me.min.y
                        && them.min.y - me.max.y < buffer
                }
                Direction::Up => {
                    (oc.x - me_center.x).abs() < tolerance
                        && them.max.y < me.max.y
                        && me.min.y - them.max.y < buffer
                }
            }
        })
    }

    /// Update taxis in order; later taxis see earlier ones already moved
    pub fn update(
        &mut self,
        player_center: Vec2,
        city: &impl SpatialQuery,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) {
        for i in 0..self.taxis.len() {
            let blocked = self.taxi_in_front(i);
            let taxi = &mut self.taxis[i];
            if taxi.update(blocked, player_center, self.world_size, city, rng, &mut self.particles)
            {
                events.push(GameEvent::Honk { taxi: taxi.id });
            }
        }
        self.particles.update();
    }

    pub fn len(&self) -> usize {
        self.taxis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taxis.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spatial::CityMap;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const WORLD: Vec2 = Vec2::new(640.0, 640.0);

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    fn taxi(id: u32, pos: Vec2, dir: Direction) -> Taxi {
        let mut t = Taxi::new(id, pos, 1.0, dir, 1.0, &mut rng());
        t.base_speed = 1.0;
        t.target_speed = 1.0;
        t.speed = 1.0;
        t
    }

    fn fleet(taxis: Vec<Taxi>) -> TaxiFleet {
        TaxiFleet {
            taxis,
            particles: ParticleSystem::default(),
            world_size: WORLD,
            scale: 1.0,
        }
    }

    fn far_player() -> Vec2 {
        Vec2::splat(-10_000.0)
    }

    fn no_roads() -> CityMap {
        CityMap::from_rows(&["...."], &["...."], 32.0)
    }

    #[test]
    fn test_taxi_behind_taxi_stops_same_tick() {
        let mut f = fleet(vec![
            taxi(0, Vec2::new(100.0, 100.0), Direction::Right),
            taxi(1, Vec2::new(140.0, 101.0), Direction::Right),
        ]);
        assert!(f.taxi_in_front(0));
        assert!(!f.taxi_in_front(1));

        let mut events = Vec::new();
        f.update(far_player(), &no_roads(), &mut rng(), &mut events);
        assert_eq!(f.taxis[0].target_speed, 0.0);
        assert_eq!(f.taxis[1].target_speed, 1.0);
        assert_eq!(f.taxis[0].phase(), TaxiPhase::Braking);
    }

    #[test]
    fn test_other_lane_or_crashed_does_not_block() {
        let mut f = fleet(vec![
            taxi(0, Vec2::new(100.0, 100.0), Direction::Right),
            taxi(1, Vec2::new(140.0, 130.0), Direction::Right),
        ]);
        assert!(!f.taxi_in_front(0));

        f.taxis[1].pos.y = 100.0;
        f.taxis[1].crashed = true;
        assert!(!f.taxi_in_front(0));
    }

    #[test]
    fn test_player_in_front_cone() {
        let t = taxi(0, Vec2::new(100.0, 100.0), Direction::Left);
        let c = t.center();
        assert!(t.player_in_front(c - Vec2::new(30.0, 5.0)));
        assert!(!t.player_in_front(c + Vec2::new(30.0, 0.0)));
        assert!(!t.player_in_front(c - Vec2::new(80.0, 0.0)));
        assert!(!t.player_in_front(c - Vec2::new(30.0, 20.0)));
    }

    #[test]
    fn test_honk_is_edge_triggered() {
        let mut f = fleet(vec![taxi(0, Vec2::new(100.0, 100.0), Direction::Down)]);
        let in_front = f.taxis[0].center() + Vec2::new(0.0, 30.0);
        let city = no_roads();
        let mut events = Vec::new();

        for _ in 0..5 {
            f.update(in_front, &city, &mut rng(), &mut events);
        }
        let honks = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Honk { .. }))
            .count();
        assert_eq!(honks, 1);
        assert_eq!(f.taxis[0].target_speed, 0.0);

        // Clear the road, then block again: a new honk
        f.update(far_player(), &city, &mut rng(), &mut events);
        assert!(!f.taxis[0].has_honked);
        let in_front = f.taxis[0].center() + Vec2::new(0.0, 30.0);
        f.update(in_front, &city, &mut rng(), &mut events);
        let honks = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Honk { .. }))
            .count();
        assert_eq!(honks, 2);
    }

    #[test]
    fn test_speed_snaps_to_zero() {
        let mut t = taxi(0, Vec2::new(100.0, 100.0), Direction::Right);
        t.speed = 0.04;
        t.target_speed = 0.0;
        t.integrate_speed();
        assert_eq!(t.speed, 0.0);

        // Braking is faster than accelerating
        t.speed = 1.0;
        t.integrate_speed();
        assert!((t.speed - (1.0 - BRAKE)).abs() < 1e-6);
        t.target_speed = 1.0;
        t.integrate_speed();
        assert!((t.speed - (1.0 - BRAKE + THROTTLE)).abs() < 1e-6);
    }

    #[test]
    fn test_swerve_toward_road() {
        // Road only in the row below the taxi
        let city = CityMap::from_rows(
            &["..........", "..........", ".........."],
            &["..........", "..........", "=========="],
            32.0,
        );
        let mut f = fleet(vec![
            taxi(0, Vec2::new(100.0, 52.0), Direction::Right),
            taxi(1, Vec2::new(140.0, 52.0), Direction::Right),
        ]);
        f.taxis[0].swerve_side = -1.0;
        let before = f.taxis[0].pos.y;
        let mut events = Vec::new();
        f.update(far_player(), &city, &mut rng(), &mut events);
        // Tried up first (no road), flipped and nudged down
        assert!((f.taxis[0].pos.y - (before + SWERVE_NUDGE)).abs() < 1e-5);
        assert_eq!(f.taxis[0].swerve_side, 1.0);
    }

    #[test]
    fn test_full_crash_and_recovery() {
        let mut r = rng();
        let mut particles = ParticleSystem::default();
        let mut t = taxi(0, Vec2::new(100.0, 100.0), Direction::Right);

        let kind = t.on_collision(Collider::Taxi { recovering: false }, &mut r, &mut particles);
        assert_eq!(kind, Some(CrashKind::Full));
        assert!(t.crashed);
        assert!(t.crash_timer >= CRASH_MIN_SECS && t.crash_timer < CRASH_MIN_SECS + CRASH_JITTER_SECS);
        assert_eq!(particles.len(), CRASH_PARTICLES);
        assert_eq!(t.speed, 0.0);

        // Ignores further hits while crashed
        assert_eq!(t.on_collision(Collider::Rival, &mut r, &mut particles), None);

        let city = no_roads();
        let mut ticks = 0;
        while t.crashed {
            t.update(false, far_player(), WORLD, &city, &mut r, &mut particles);
            assert_eq!(t.speed, 0.0);
            ticks += 1;
            assert!(ticks < 20 * 60);
        }
        assert!(particles.len() > CRASH_PARTICLES);
        assert_eq!(t.phase(), TaxiPhase::Recovering);
        assert_eq!(t.speed, 0.0);
        assert_eq!(t.target_speed, t.base_speed);

        // Immune during recovery
        assert_eq!(t.on_collision(Collider::Player, &mut r, &mut particles), None);
    }

    #[test]
    fn test_silent_crash_from_player() {
        let mut t = taxi(0, Vec2::new(100.0, 100.0), Direction::Up);
        let mut particles = ParticleSystem::default();
        let kind = t.on_collision(Collider::Player, &mut rng(), &mut particles);
        assert_eq!(kind, Some(CrashKind::Silent));
        assert_eq!(t.crash_timer, SILENT_CRASH_SECS);
        assert!(particles.is_empty());
    }

    #[test]
    fn test_recovering_partner_does_not_crash_us() {
        let mut t = taxi(0, Vec2::new(100.0, 100.0), Direction::Up);
        let mut particles = ParticleSystem::default();
        let kind = t.on_collision(Collider::Taxi { recovering: true }, &mut rng(), &mut particles);
        assert_eq!(kind, None);
        assert!(!t.crashed);
    }

    #[test]
    fn test_respawn_at_opposite_edge() {
        let mut f = fleet(vec![taxi(0, Vec2::new(639.0, 200.0), Direction::Right)]);
        f.taxis[0].pos.x = WORLD.x + EXIT_BUFFER + 0.5;
        let mut events = Vec::new();
        f.update(far_player(), &no_roads(), &mut rng(), &mut events);

        let t = &f.taxis[0];
        assert!(t.pos.x < 0.0);
        assert!((t.pos.y - 200.0).abs() <= RESPAWN_JITTER / 2.0);
        assert!(t.speed >= 1.0 && t.speed < 2.5);
        assert_eq!(t.speed, t.base_speed);
        assert!(t.is_recovering());
    }

    #[test]
    fn test_fleet_from_spawns() {
        let spawns = [
            TaxiSpawn {
                pos: Vec2::new(10.0, 20.0),
                direction: Direction::Up,
            },
            TaxiSpawn {
                pos: Vec2::new(30.25, 0.0),
                direction: Direction::Left,
            },
        ];
        let f = TaxiFleet::from_spawns(&spawns, 2.0, WORLD, &mut rng());
        assert_eq!(f.len(), 2);
        assert_eq!(f.taxis[0].pos, Vec2::new(20.0, 40.0));
        assert_eq!(f.taxis[0].size, Vec2::new(32.0, 64.0));
        assert_eq!(f.taxis[1].size, Vec2::new(64.0, 32.0));
        assert!(f.taxis[1].base_speed >= 1.25 && f.taxis[1].base_speed < 1.75);
    }

    #[test]
    fn test_empty_fleet_is_fine() {
        let mut f = TaxiFleet::default();
        let mut events = Vec::new();
        f.update(Vec2::ZERO, &no_roads(), &mut rng(), &mut events);
        assert!(f.is_empty());
        assert!(!f.taxi_in_front(0));
    }

    proptest! {
        #[test]
        fn prop_speed_never_negative(targets in proptest::collection::vec(prop_oneof![Just(0.0f32), 0.0f32..3.0], 1..300)) {
            let mut t = taxi(0, Vec2::new(100.0, 100.0), Direction::Right);
            for target in targets {
                t.target_speed = target;
                t.integrate_speed();
                prop_assert!(t.speed >= 0.0);
                if target == 0.0 && t.speed < STOP_EPSILON {
                    prop_assert_eq!(t.speed, 0.0);
                }
            }
        }
    }
}
