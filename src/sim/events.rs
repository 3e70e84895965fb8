//! Side effects the simulation asks the host to perform
//!
//! The core never talks to audio, camera or haptics directly. Each tick it
//! appends events here and the host drains them after the tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Race scene started (start stinger)
    RaceStarted,
    /// Start the looping race track
    MusicStart,
    /// Stop the looping race track
    MusicStop,
    /// A taxi honked at the player
    Honk { taxi: u32 },
    /// A taxi hit the player
    PlayerHit { health: u8 },
    /// Two taxis (or a taxi and a rival) piled up
    TaxiPileup { pos: Vec2 },
    /// Add camera shake
    CameraShake(f32),
    /// Vibrate the device
    Haptic { duration_ms: u32 },
    /// Player health reached zero
    PlayerHospitalized,
    /// Player completed a delivery
    CheckpointReached { name: String, fare: u32 },
    /// A rival crossed the finish line
    RivalFinished { name: String, time_secs: f32 },
    /// Player crossed the finish line with every delivery done
    RaceFinished { time_secs: f32 },
}
