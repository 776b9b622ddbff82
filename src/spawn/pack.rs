//! Pack bookkeeping and member placement around a leader

use std::collections::BTreeSet;
use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::SpawnConfig;
use crate::core::types::{CreatureId, PackId, TilePos};

/// A runtime grouping of creatures spawned together.
///
/// `members` includes the leader. A pack whose membership drops to one
/// or fewer is dissolved by the manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pack {
    pub id: PackId,
    pub species: String,
    pub leader: Option<CreatureId>,
    pub members: BTreeSet<CreatureId>,
}

impl Pack {
    pub fn new(id: PackId, species: String, leader: CreatureId) -> Self {
        let mut members = BTreeSet::new();
        members.insert(leader);
        Self {
            id,
            species,
            leader: Some(leader),
            members,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: CreatureId) -> bool {
        self.members.contains(&id)
    }

    /// Members other than the leader
    pub fn followers(&self) -> impl Iterator<Item = CreatureId> + '_ {
        self.members
            .iter()
            .copied()
            .filter(move |id| Some(*id) != self.leader)
    }
}

/// Candidate tiles for one pack member, best first.
///
/// Concentric rings around the leader come first, then a square spiral,
/// then random samples within the maximum radius. The caller validates
/// each candidate and takes the first that fits.
pub fn member_candidates<R: Rng + ?Sized>(leader: TilePos, config: &SpawnConfig, rng: &mut R) -> Vec<TilePos> {
    let mut candidates = ring_candidates(leader, config.pack_base_radius, config.pack_max_radius);
    candidates.extend(spiral_candidates(leader, config.pack_max_radius.floor() as i32));

    for _ in 0..config.pack_random_tries {
        let angle = rng.gen_range(0.0..TAU);
        let distance = rng.gen_range(1.0..=config.pack_max_radius.max(1.0));
        candidates.push(offset(leader, angle, distance));
    }
    candidates
}

fn ring_candidates(center: TilePos, base: f32, max: f32) -> Vec<TilePos> {
    let mut out = Vec::new();
    let mut radius = base;
    while radius <= max {
        let points = ((radius * 4.0).round() as usize).max(8);
        for i in 0..points {
            let angle = TAU * i as f32 / points as f32;
            let tile = offset(center, angle, radius);
            if tile != center && !out.contains(&tile) {
                out.push(tile);
            }
        }
        radius += 1.0;
    }
    out
}

/// Square rings of Chebyshev distance 1..=extent
fn spiral_candidates(center: TilePos, extent: i32) -> Vec<TilePos> {
    let mut out = Vec::new();
    for layer in 1..=extent {
        for dx in -layer..=layer {
            for dy in -layer..=layer {
                if dx.abs() == layer || dy.abs() == layer {
                    out.push(TilePos::new(center.x + dx, center.y + dy));
                }
            }
        }
    }
    out
}

fn offset(center: TilePos, angle: f32, distance: f32) -> TilePos {
    TilePos::new(
        center.x + (angle.cos() * distance).round() as i32,
        center.y + (angle.sin() * distance).round() as i32,
    )
}
