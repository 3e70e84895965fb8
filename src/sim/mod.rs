//! Deterministic race simulation
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only, passed down explicitly
//! - Stable update order (player, taxis, rivals, collisions)
//! - Side effects leave as [`GameEvent`]s; no audio, rendering or platform calls

pub mod collision;
pub mod events;
pub mod geom;
pub mod grid;
pub mod manifest;
pub mod movement;
pub mod player;
pub mod rival;
pub mod spatial;
pub mod state;
pub mod taxi;
pub mod tick;

pub use collision::{ActorId, Collider, CollisionReport, resolve_entity_collisions};
pub use events::GameEvent;
pub use geom::{Direction, Rect};
pub use grid::CollisionGrid;
pub use manifest::{Checkpoint, Client, Manifest};
pub use movement::resolve_player_movement;
pub use player::{HitOutcome, Player, PlayerInput, PlayerState};
pub use rival::{RivalBiker, RivalPack};
pub use spatial::{CityMap, SpatialQuery};
pub use state::{HudSnapshot, RacePhase, RaceState};
pub use taxi::{ParticleSystem, Taxi, TaxiFleet, TaxiPhase};
pub use tick::{TickInput, tick};
