//! End-of-race standings
//!
//! Finishers rank by time, fastest first; everyone still on the road trails
//! behind in roster order with the player listed first.

use serde::{Deserialize, Serialize};

use crate::sim::RivalPack;

/// Display name used for the player
pub const PLAYER_NAME: &str = "You";

/// One rider's result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub name: String,
    /// Race time in seconds, `None` if they never finished
    pub time_secs: Option<f32>,
    pub is_player: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Standings {
    pub entries: Vec<StandingEntry>,
}

impl Standings {
    pub fn new(player_time: Option<f32>, rivals: &RivalPack) -> Self {
        let mut entries = Vec::with_capacity(1 + rivals.rivals.len());
        entries.push(StandingEntry {
            name: PLAYER_NAME.to_string(),
            time_secs: player_time,
            is_player: true,
        });
        entries.extend(rivals.rivals.iter().map(|r| StandingEntry {
            name: r.name.clone(),
            time_secs: r.finish_time,
            is_player: false,
        }));

        // Stable sort keeps roster order among non-finishers and ties
        entries.sort_by(|a, b| match (a.time_secs, b.time_secs) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        Self { entries }
    }

    /// The player's place (1-indexed)
    pub fn player_rank(&self) -> Option<usize> {
        self.entries.iter().position(|e| e.is_player).map(|i| i + 1)
    }

    pub fn winner(&self) -> Option<&StandingEntry> {
        self.entries.first().filter(|e| e.time_secs.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
