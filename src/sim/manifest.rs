//! The delivery manifest
//!
//! A manifest is generated once per race from the map's checkpoint candidates:
//! shuffled, truncated to a random length of at least two, and the last stop
//! made the finish line. Every checkpoint carries a pacing client for show.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::map::CheckpointSpawn;

/// How far a client strays from its spawn before turning around
const CLIENT_PACE_DIST: f32 = 50.0;
const CLIENT_WALK_SPEED: f32 = 0.4;
const CLIENT_BOB_STEP: f32 = 0.05;
/// Name used when the map offers no checkpoints at all
pub const FALLBACK_FINISH_NAME: &str = "Finish";

/// Decorative customer pacing near a checkpoint. Never collides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub pos: Vec2,
    pub start_x: f32,
    /// +1 or -1
    pub direction: f32,
    pub pause_timer: u32,
    /// Phase of the idle bob
    pub bob: f32,
    /// Sprite variant index
    pub variant: usize,
}

impl Client {
    pub fn new(pos: Vec2, variant: usize) -> Self {
        Self {
            pos,
            start_x: pos.x,
            direction: 1.0,
            pause_timer: 0,
            bob: 0.0,
            variant,
        }
    }

    pub fn update(&mut self, rng: &mut impl Rng) {
        self.bob += CLIENT_BOB_STEP;
        if self.pause_timer > 0 {
            self.pause_timer -= 1;
            return;
        }
        self.pos.x += self.direction * CLIENT_WALK_SPEED;
        if (self.pos.x - self.start_x).abs() > CLIENT_PACE_DIST {
            self.direction = -self.direction;
            self.pause_timer = rng.random_range(60..180);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub name: String,
    /// World position
    pub pos: Vec2,
    pub complete: bool,
    pub finish_line: bool,
    pub client: Client,
}

impl Checkpoint {
    fn new(name: String, pos: Vec2, variant: usize) -> Self {
        Self {
            name,
            pos,
            complete: false,
            finish_line: false,
            client: Client::new(pos, variant),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub checkpoints: Vec<Checkpoint>,
}

impl Manifest {
    /// Build a manifest from map candidates.
    ///
    /// `scale` converts map pixels to world pixels. `fallback` is where the
    /// lone finish line goes when the map has no candidates. The result
    /// always holds exactly one finish line, and it is the last entry.
    pub fn generate(
        spawns: &[CheckpointSpawn],
        scale: f32,
        client_variants: usize,
        fallback: Vec2,
        rng: &mut impl Rng,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut candidates = spawns
            .iter()
            .filter(|s| seen.insert(s.name.as_str()))
            .map(|s| {
                let variant = if client_variants > 0 {
                    rng.random_range(0..client_variants)
                } else {
                    0
                };
                Checkpoint::new(s.name.clone(), s.pos * scale, variant)
            })
            .collect::<Vec<_>>();

        if candidates.is_empty() {
            log::warn!("No checkpoint candidates on the map; using a lone finish line");
            candidates.push(Checkpoint::new(FALLBACK_FINISH_NAME.to_string(), fallback, 0));
        }

        candidates.shuffle(rng);
        let keep = if candidates.len() > 2 {
            rng.random_range(2..=candidates.len())
        } else {
            candidates.len()
        };
        candidates.truncate(keep);

        if let Some(last) = candidates.last_mut() {
            last.finish_line = true;
        }

        log::info!(
            "Manifest: {} stops out of {} candidates",
            candidates.len(),
            seen.len().max(1)
        );
        for (i, cp) in candidates.iter().enumerate() {
            log::debug!("  {}: {}{}", i, cp.name, if cp.finish_line { " (finish)" } else { "" });
        }

        Self {
            checkpoints: candidates,
        }
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn finish_line(&self) -> Option<&Checkpoint> {
        self.checkpoints.iter().find(|cp| cp.finish_line)
    }

    pub fn find(&self, name: &str) -> Option<&Checkpoint> {
        self.checkpoints.iter().find(|cp| cp.name == name)
    }

    /// Names of every stop except the finish line, in manifest order
    pub fn delivery_names(&self) -> Vec<String> {
        self.checkpoints
            .iter()
            .filter(|cp| !cp.finish_line)
            .map(|cp| cp.name.clone())
            .collect()
    }

    /// All non-finish stops are done
    pub fn deliveries_done(&self) -> bool {
        self.checkpoints
            .iter()
            .all(|cp| cp.finish_line || cp.complete)
    }

    pub fn completed_count(&self) -> usize {
        self.checkpoints.iter().filter(|cp| cp.complete).count()
    }

    pub fn is_finished(&self) -> bool {
        self.finish_line().is_some_and(|cp| cp.complete)
    }

    /// Mark a stop complete. The finish line is refused until every delivery is done.
    pub fn try_complete(&mut self, index: usize) -> bool {
        let deliveries_done = self.deliveries_done();
        let Some(cp) = self.checkpoints.get_mut(index) else {
            return false;
        };
        if cp.complete || (cp.finish_line && !deliveries_done) {
            return false;
        }
        cp.complete = true;
        true
    }

    /// Clear completion flags for a restart with the same stops
    pub fn reset(&mut self) {
        for cp in &mut self.checkpoints {
            cp.complete = false;
        }
    }

    pub fn update_clients(&mut self, rng: &mut impl Rng) {
        for cp in &mut self.checkpoints {
            cp.client.update(rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spawns(names: &[&str]) -> Vec<CheckpointSpawn> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| CheckpointSpawn {
                name: n.to_string(),
                pos: Vec2::new(i as f32 * 100.0, 50.0),
            })
            .collect()
    }

    #[test]
    fn test_finish_line_is_last_and_unique() {
        let mut rng = Pcg32::seed_from_u64(3);
        let m = Manifest::generate(&spawns(&["A", "B", "C", "D", "E"]), 2.0, 4, Vec2::ZERO, &mut rng);
        assert!(m.len() >= 2 && m.len() <= 5);
        assert_eq!(m.checkpoints.iter().filter(|c| c.finish_line).count(), 1);
        assert!(m.checkpoints.last().is_some_and(|c| c.finish_line));
        assert!(m.checkpoints.iter().all(|c| c.client.variant < 4));
        assert_eq!(m.delivery_names().len(), m.len() - 1);
    }

    #[test]
    fn test_positions_are_scaled() {
        let mut rng = Pcg32::seed_from_u64(3);
        let m = Manifest::generate(&spawns(&["Only"]), 2.0, 0, Vec2::ZERO, &mut rng);
        assert_eq!(m.len(), 1);
        assert_eq!(m.checkpoints[0].pos, Vec2::new(0.0, 100.0));
        assert!(m.checkpoints[0].finish_line);
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let mut rng = Pcg32::seed_from_u64(9);
        let m = Manifest::generate(&spawns(&["A", "A", "B"]), 1.0, 1, Vec2::ZERO, &mut rng);
        assert_eq!(m.len(), 2);
        let a = m.find("A").map(|c| c.pos);
        assert_eq!(a, Some(Vec2::new(0.0, 50.0)));
    }

    #[test]
    fn test_empty_candidates_yield_fallback_finish() {
        let mut rng = Pcg32::seed_from_u64(1);
        let fallback = Vec2::new(320.0, 240.0);
        let m = Manifest::generate(&[], 2.0, 3, fallback, &mut rng);
        assert_eq!(m.len(), 1);
        let finish = m.finish_line().map(|c| (c.name.as_str(), c.pos));
        assert_eq!(finish, Some((FALLBACK_FINISH_NAME, fallback)));
        assert!(m.deliveries_done());
    }

    #[test]
    fn test_finish_refused_until_deliveries_done() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut m = Manifest::generate(&spawns(&["A", "B"]), 1.0, 0, Vec2::ZERO, &mut rng);
        assert!(!m.try_complete(1));
        assert!(!m.is_finished());
        assert!(m.try_complete(0));
        assert!(!m.try_complete(0));
        assert!(m.try_complete(1));
        assert!(m.is_finished());
        assert_eq!(m.completed_count(), 2);
        assert!(!m.try_complete(7));

        m.reset();
        assert_eq!(m.completed_count(), 0);
        assert!(!m.is_finished());
    }

    #[test]
    fn test_client_paces_and_pauses() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut c = Client::new(Vec2::new(100.0, 0.0), 0);
        let mut ticks = 0;
        while c.pause_timer == 0 {
            c.update(&mut rng);
            ticks += 1;
            assert!(ticks < 200);
        }
        assert!(c.pos.x > 150.0);
        assert_eq!(c.direction, -1.0);
        assert!((60..180).contains(&c.pause_timer));

        let x = c.pos.x;
        c.update(&mut rng);
        assert_eq!(c.pos.x, x);
        assert!(c.bob > 0.0);
    }

    proptest! {
        #[test]
        fn prop_exactly_one_finish(n in 0usize..12, seed in any::<u64>()) {
            let names = (0..n).map(|i| format!("Stop {i}")).collect::<Vec<_>>();
            let refs = names.iter().map(String::as_str).collect::<Vec<_>>();
            let mut rng = Pcg32::seed_from_u64(seed);
            let m = Manifest::generate(&spawns(&refs), 1.0, 2, Vec2::ZERO, &mut rng);
            prop_assert_eq!(m.checkpoints.iter().filter(|c| c.finish_line).count(), 1);
            if n >= 2 {
                prop_assert!(m.len() >= 2);
            }
        }
    }
}
