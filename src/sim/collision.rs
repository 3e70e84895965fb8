//! Actor-vs-actor collision pass
//!
//! Runs once per tick after everything has moved. Eligibility is decided up
//! front: crashed taxis and finished rivals sit the whole pass out. Every
//! overlapping pair is handled once, and both sides hear about the other.

use glam::Vec2;
use rand::Rng;

use super::geom::Rect;
use super::player::{HitOutcome, Player};
use super::rival::RivalPack;
use super::spatial::SpatialQuery;
use super::taxi::{CrashKind, TaxiFleet};

/// Which actor a handler runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActorId {
    Player,
    Taxi(usize),
    Rival(usize),
}

/// What an actor collided with, as seen by its handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collider {
    Player,
    Taxi { recovering: bool },
    Rival,
}

/// Snapshot of one eligible actor taken at the start of the pass
#[derive(Debug, Clone, Copy)]
struct Body {
    id: ActorId,
    rect: Rect,
    collider: Collider,
}

#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    /// The player overlapped a live taxi this tick
    pub player_hit: bool,
    /// Damage actually applied to the player, if any
    pub player_outcome: Option<HitOutcome>,
    /// Centers of taxis that went into a full crash
    pub pileups: Vec<Vec2>,
    /// Every handler call as (receiver, partner), in call order
    pub notified: Vec<(ActorId, ActorId)>,
}

fn eligible_bodies(player: &Player, fleet: &TaxiFleet, rivals: &RivalPack) -> Vec<Body> {
    let mut bodies = Vec::with_capacity(1 + fleet.taxis.len() + rivals.rivals.len());
    bodies.push(Body {
        id: ActorId::Player,
        rect: player.bounds(),
        collider: Collider::Player,
    });
    bodies.extend(
        fleet
            .taxis
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.crashed)
            .map(|(i, t)| Body {
                id: ActorId::Taxi(i),
                rect: t.bounds(),
                collider: Collider::Taxi {
                    recovering: t.is_recovering(),
                },
            }),
    );
    bodies.extend(
        rivals
            .rivals
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.finished)
            .map(|(i, r)| Body {
                id: ActorId::Rival(i),
                rect: r.bounds(),
                collider: Collider::Rival,
            }),
    );
    bodies
}

/// Test every eligible pair and run both handlers on each overlap.
///
/// The player's handler runs before its partner's so a taxi hit is scored
/// against the taxi's pre-crash position.
pub fn resolve_entity_collisions(
    player: &mut Player,
    fleet: &mut TaxiFleet,
    rivals: &mut RivalPack,
    city: &impl SpatialQuery,
    rng: &mut impl Rng,
) -> CollisionReport {
    let bodies = eligible_bodies(player, fleet, rivals);
    let mut report = CollisionReport::default();

    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            if !a.rect.overlaps(&b.rect) {
                continue;
            }
            notify(a, b, player, fleet, rivals, city, rng, &mut report);
            notify(b, a, player, fleet, rivals, city, rng, &mut report);
        }
    }

    report
}

#[allow(clippy::too_many_arguments)]
fn notify(
    receiver: &Body,
    partner: &Body,
    player: &mut Player,
    fleet: &mut TaxiFleet,
    rivals: &mut RivalPack,
    city: &impl SpatialQuery,
    rng: &mut impl Rng,
    report: &mut CollisionReport,
) {
    report.notified.push((receiver.id, partner.id));

    match (receiver.id, partner.collider) {
        (ActorId::Player, Collider::Taxi { .. }) => {
            report.player_hit = true;
            let outcome = player.on_taxi_hit(partner.rect.center(), city);
            if outcome != HitOutcome::Ignored {
                report.player_outcome = Some(outcome);
            }
        }
        // Only taxis hurt the player
        (ActorId::Player, _) => {}
        (ActorId::Taxi(i), other) => {
            let Some(taxi) = fleet.taxis.get_mut(i) else {
                return;
            };
            if taxi.on_collision(other, rng, &mut fleet.particles) == Some(CrashKind::Full) {
                report.pileups.push(taxi.center());
            }
        }
        (ActorId::Rival(i), other) => {
            if let Some(rival) = rivals.rivals.get_mut(i) {
                rival.on_collision(other);
            }
        }
    }
}
