//! Fixed timestep race tick
//!
//! One call advances the race by one frame in a fixed order: player, taxis,
//! rivals, then the collision pass, then checkpoints. Actors updated later in
//! the tick see where earlier ones already moved to.

use super::collision::resolve_entity_collisions;
use super::events::GameEvent;
use super::movement::resolve_player_movement;
use super::player::{HitOutcome, PlayerInput};
use super::state::{RacePhase, RaceState};
use crate::consts::CHECKPOINT_RADIUS;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub player: PlayerInput,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the race by one fixed timestep
pub fn tick(state: &mut RaceState, input: &TickInput) {
    if input.pause {
        match state.phase {
            RacePhase::Racing => {
                state.phase = RacePhase::Paused;
                return;
            }
            RacePhase::Paused => state.phase = RacePhase::Racing,
            _ => {}
        }
    }

    if state.phase != RacePhase::Racing {
        return;
    }

    state.time_ticks += 1;

    state.screen_shake *= 0.9;
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }

    // Player
    state.player.update_input(&input.player);
    let world = state.city.world_size();
    resolve_player_movement(&mut state.player, &state.city, world);

    // Traffic, then rivals
    let player_center = state.player.center();
    state
        .taxis
        .update(player_center, &state.city, &mut state.rng, &mut state.events);
    let race_time = state.race_time_secs();
    state.rivals.update(
        &state.manifest,
        &state.taxis.taxis,
        &state.city,
        race_time,
        &mut state.events,
    );

    resolve_collisions(state);
    if state.phase != RacePhase::Racing {
        return;
    }

    state.manifest.update_clients(&mut state.rng);
    check_checkpoints(state);
}

fn resolve_collisions(state: &mut RaceState) {
    let report = resolve_entity_collisions(
        &mut state.player,
        &mut state.taxis,
        &mut state.rivals,
        &state.city,
        &mut state.rng,
    );

    if report.player_hit {
        let shake = state.config.hit_shake;
        state.screen_shake = state.screen_shake.max(shake);
        state.events.push(GameEvent::CameraShake(shake));
        if let Some(duration_ms) = state.config.effective_haptics() {
            state.events.push(GameEvent::Haptic { duration_ms });
        }
    }

    match report.player_outcome {
        Some(HitOutcome::Damaged { health }) => {
            if let Some(level) = hit_log_level(state.config.debug) {
                log::log!(level, "Player hit by taxi, health {health}");
            }
            state.events.push(GameEvent::PlayerHit { health });
        }
        Some(HitOutcome::Hospitalized) => {
            log::info!("Player hospitalized after {:.1}s", state.race_time_secs());
            state.events.push(GameEvent::PlayerHit { health: 0 });
            state.events.push(GameEvent::PlayerHospitalized);
            state.events.push(GameEvent::MusicStop);
            state.phase = RacePhase::GameOver;
        }
        Some(HitOutcome::Ignored) | None => {}
    }

    for pos in report.pileups {
        state.events.push(GameEvent::TaxiPileup { pos });
    }
}

/// Per-hit health lines are only written with the debug flag on
fn hit_log_level(debug: bool) -> Option<log::Level> {
    debug.then_some(log::Level::Info)
}

/// Deliveries pay out on arrival; the finish line only counts once they are all done
fn check_checkpoints(state: &mut RaceState) {
    let center = state.player.center();
    let reached = state
        .manifest
        .checkpoints
        .iter()
        .enumerate()
        .filter(|(_, cp)| !cp.complete && cp.pos.distance(center) < CHECKPOINT_RADIUS)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();

    for i in reached {
        if !state.manifest.try_complete(i) {
            continue;
        }
        let cp = &state.manifest.checkpoints[i];
        if cp.finish_line {
            let time_secs = state.race_time_secs();
            log::info!("Player finished in {time_secs:.1}s");
            state.player_finish_time = Some(time_secs);
            state.phase = RacePhase::Finished;
            state.events.push(GameEvent::RaceFinished { time_secs });
            state.events.push(GameEvent::MusicStop);
            return;
        }
        let fare = state.config.checkpoint_fare;
        state.player.cash += fare;
        log::info!("Delivered to {}", cp.name);
        state.events.push(GameEvent::CheckpointReached {
            name: cp.name.clone(),
            fare,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Layer, MapObject, Property, TileMap};
    use crate::settings::SimConfig;
    use crate::sim::player::{MAX_HEALTH, STARTING_CASH};
    use crate::sim::taxi::Taxi;
    use crate::sim::Direction;
    use glam::Vec2;
    use proptest::prelude::*;

    fn object(id: u32, name: &str, x: f32, y: f32, location: Option<&str>) -> MapObject {
        MapObject {
            id,
            name: name.to_string(),
            x,
            y,
            properties: location
                .map(|l| Property {
                    name: "location".to_string(),
                    kind: "string".to_string(),
                    value: serde_json::Value::String(l.to_string()),
                })
                .into_iter()
                .collect(),
            ..Default::default()
        }
    }

    /// 20x20 open map at scale 1 with no taxis and two stops
    fn race(seed: u64) -> RaceState {
        let map = TileMap {
            width: 20,
            height: 20,
            tile_width: 32,
            tile_height: 32,
            layers: vec![
                Layer::tiles(crate::consts::ROAD_LAYER, vec![2; 400]),
                Layer::objects(
                    "Spawns",
                    vec![
                        object(1, "player", 100.0, 100.0, None),
                        object(2, "cp", 400.0, 100.0, Some("Bodega")),
                        object(3, "cp", 100.0, 400.0, Some("Gallery")),
                    ],
                ),
            ],
        };
        let config = SimConfig {
            map_scale: 1.0,
            ..Default::default()
        };
        let mut state = RaceState::new(&map, config, seed).unwrap();
        // Park the rivals out of the way
        for r in &mut state.rivals.rivals {
            r.start_delay = u32::MAX;
        }
        state.drain_events();
        state
    }

    fn parked_taxi_on_player(state: &RaceState) -> Taxi {
        let mut t = Taxi::new(
            0,
            state.player.pos,
            0.0,
            Direction::Right,
            1.0,
            &mut rand_pcg::Pcg32::new(1, 1),
        );
        t.base_speed = 0.0;
        t.speed = 0.0;
        t.target_speed = 0.0;
        t
    }

    #[test]
    fn test_pause_toggles() {
        let mut state = race(1);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, RacePhase::Paused);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, 0);

        tick(&mut state, &pause);
        assert_eq!(state.phase, RacePhase::Racing);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_delivery_pays_and_finish_ends_race() {
        let mut state = race(2);
        let finish = state.manifest.checkpoints.iter().position(|c| c.finish_line).unwrap();
        let delivery = 1 - finish;

        // Finish first: refused
        state.player.pos = state.manifest.checkpoints[finish].pos;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, RacePhase::Racing);
        assert!(!state.manifest.checkpoints[finish].complete);

        state.player.pos = state.manifest.checkpoints[delivery].pos;
        tick(&mut state, &TickInput::default());
        assert!(state.manifest.checkpoints[delivery].complete);
        assert_eq!(state.player.cash, STARTING_CASH + state.config.checkpoint_fare);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::CheckpointReached { .. })));

        state.player.pos = state.manifest.checkpoints[finish].pos;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, RacePhase::Finished);
        assert!(state.player_finish_time.is_some());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::MusicStop));
        assert_eq!(state.standings().entries[0].name, crate::standings::PLAYER_NAME);

        // Terminal: the clock stops
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_taxi_hit_shakes_and_damages() {
        let mut state = race(3);
        state.config.haptics = true;
        let taxi = parked_taxi_on_player(&state);
        state.taxis.taxis.push(taxi);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.health, MAX_HEALTH - 25);
        assert!(state.screen_shake > 0.0);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::PlayerHit { health: 75 }));
        assert!(events.contains(&GameEvent::Haptic { duration_ms: 50 }));
        assert!(events.iter().any(|e| matches!(e, GameEvent::CameraShake(_))));
        assert!(state.taxis.taxis[0].crashed);
    }

    #[test]
    fn test_hospitalized_is_game_over_once() {
        let mut state = race(4);
        state.player.health = 25;
        let taxi = parked_taxi_on_player(&state);
        state.taxis.taxis.push(taxi);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, RacePhase::GameOver);
        assert!(state.player.is_hospitalized());
        let events = state.drain_events();
        let count = events
            .iter()
            .filter(|e| **e == GameEvent::PlayerHospitalized)
            .count();
        assert_eq!(count, 1);
        let hospitalized = events.iter().position(|e| *e == GameEvent::PlayerHospitalized);
        let music_stop = events.iter().position(|e| *e == GameEvent::MusicStop);
        assert!(music_stop.is_some());
        assert!(music_stop > hospitalized);

        tick(&mut state, &TickInput::default());
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_hit_logging_follows_debug_flag() {
        assert_eq!(hit_log_level(true), Some(log::Level::Info));
        assert_eq!(hit_log_level(false), None);
    }

    #[test]
    fn test_shake_decays_to_zero() {
        let mut state = race(5);
        state.screen_shake = 12.0;
        for _ in 0..120 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.screen_shake, 0.0);
    }

    #[test]
    fn test_determinism() {
        let mut a = race(99);
        let mut b = race(99);
        for r in a.rivals.rivals.iter_mut().chain(b.rivals.rivals.iter_mut()) {
            r.start_delay = 0;
        }
        let input = TickInput {
            player: PlayerInput {
                axis: Vec2::new(1.0, 0.0),
                ..Default::default()
            },
            ..Default::default()
        };
        for _ in 0..300 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.player.pos, b.player.pos);
        for (ra, rb) in a.rivals.rivals.iter().zip(&b.rivals.rivals) {
            assert_eq!(ra.pos, rb.pos);
            assert_eq!(ra.route, rb.route);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_health_in_range_and_hospitalized_once(
            seed in any::<u64>(),
            steer in proptest::collection::vec((-1.0f32..1.0, -1.0f32..1.0), 1..200),
        ) {
            let mut state = race(seed);
            for i in 0..4u32 {
                let mut t = parked_taxi_on_player(&state);
                t.id = i;
                t.pos += Vec2::new(i as f32 * 20.0, 0.0);
                state.taxis.taxis.push(t);
            }
            let mut hospitalized = 0;
            for (x, y) in steer {
                let input = TickInput {
                    player: PlayerInput { axis: Vec2::new(x, y), ..Default::default() },
                    ..Default::default()
                };
                tick(&mut state, &input);
                prop_assert!(state.player.health <= MAX_HEALTH);
                hospitalized += state
                    .drain_events()
                    .iter()
                    .filter(|e| **e == GameEvent::PlayerHospitalized)
                    .count();
            }
            prop_assert!(hospitalized <= 1);
            prop_assert_eq!(hospitalized == 1, state.player.is_hospitalized());
        }
    }
}
