//! Player movement against the tile grid
//!
//! Axis-separated: X first, then Y. A step into a solid tile is undone and
//! that axis's velocity dropped. If the player already started the tick inside
//! a wall (a taxi can knock them there), a step is still accepted as long as
//! it shrinks the overlap, so they can always work their way out.

use glam::Vec2;

use super::geom::Rect;
use super::player::Player;
use super::spatial::SpatialQuery;

/// Apply the player's velocity for one tick and keep them inside `world`
pub fn resolve_player_movement(player: &mut Player, city: &impl SpatialQuery, world: Vec2) {
    let stuck_at_start = city.rect_hits_solid(&player.bounds());

    let before = player.bounds();
    player.pos.x += player.vel.x;
    if step_blocked(&before, &player.bounds(), stuck_at_start, city) {
        player.pos.x = before.min.x;
        player.vel.x = 0.0;
    }

    let before = player.bounds();
    player.pos.y += player.vel.y;
    if step_blocked(&before, &player.bounds(), stuck_at_start, city) {
        player.pos.y = before.min.y;
        player.vel.y = 0.0;
    }

    let max = (world - player.size).max(Vec2::ZERO);
    let clamped = player.pos.clamp(Vec2::ZERO, max);
    if clamped.x != player.pos.x {
        player.vel.x = 0.0;
    }
    if clamped.y != player.pos.y {
        player.vel.y = 0.0;
    }
    player.pos = clamped;
}

fn step_blocked(before: &Rect, after: &Rect, stuck_at_start: bool, city: &impl SpatialQuery) -> bool {
    if !city.rect_hits_solid(after) {
        return false;
    }
    !(stuck_at_start && city.solid_overlap(after) < city.solid_overlap(before))
}
