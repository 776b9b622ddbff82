//! Cardinal step selection
//!
//! All movement is one tile along one axis. Two policies pick the axis when
//! both need movement: the dominant (larger) displacement, or a random pick
//! among the axes that still need movement. Behaviors choose per use.

use rand::Rng;

use crate::core::types::{Direction, TilePos};

/// How a behavior breaks ties between the x and y axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPolicy {
    Dominant,
    RandomAmongNeeded,
}

/// Candidate directions toward `to`, best first. Empty when already there.
pub fn directions_toward<R: Rng + ?Sized>(
    from: TilePos,
    to: TilePos,
    policy: AxisPolicy,
    rng: &mut R,
) -> Vec<Direction> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let horizontal = Direction::horizontal(dx);
    let vertical = Direction::vertical(dy);

    let horizontal_first = match policy {
        AxisPolicy::Dominant => dx.abs() >= dy.abs(),
        AxisPolicy::RandomAmongNeeded => match (horizontal, vertical) {
            (Some(_), Some(_)) => rng.gen_bool(0.5),
            (Some(_), None) => true,
            _ => false,
        },
    };

    let ordered = if horizontal_first {
        [horizontal, vertical]
    } else {
        [vertical, horizontal]
    };
    ordered.into_iter().flatten().collect()
}

/// Direction directly away from `threat` along the dominant axis.
/// Ties and zero displacement resolve toward +x.
pub fn away_from(from: TilePos, threat: TilePos) -> Direction {
    let dx = from.x - threat.x;
    let dy = from.y - threat.y;
    if dx.abs() >= dy.abs() {
        if dx >= 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy >= 0 {
        Direction::Up
    } else {
        Direction::Down
    }
}

/// Manhattan distance in tiles
pub fn tile_distance(a: TilePos, b: TilePos) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
