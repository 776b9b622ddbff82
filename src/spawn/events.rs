//! Population events and the hook for outside listeners

use serde::{Deserialize, Serialize};

use crate::core::types::{ChunkCoord, CreatureId, PackId, TilePos};
use crate::simulation::controller::InteractionFlavor;

/// Why a creature left the population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DespawnReason {
    Expired,
    Removed,
    /// Removed on behalf of a remote authority
    Network,
}

/// Events generated during a manager tick
///
/// Returned by `SpawnManager::tick` for logs and front ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WildEvent {
    Spawned {
        id: CreatureId,
        species: String,
        level: u32,
        tile: TilePos,
        chunk: ChunkCoord,
    },
    Despawned {
        id: CreatureId,
        reason: DespawnReason,
    },
    PackFormed {
        pack: PackId,
        leader: CreatureId,
        size: usize,
    },
    PackDissolved {
        pack: PackId,
    },
    /// A Social behavior met a neighbor
    Interaction {
        id: CreatureId,
        partner: CreatureId,
        flavor: InteractionFlavor,
    },
}

/// Listener for spawn and despawn notifications (a network layer, usually).
///
/// Network-driven spawns and despawns are never reported back here.
pub trait SpawnNotifier: Send {
    fn on_spawn(&mut self, _event: &WildEvent) {}

    fn on_despawn(&mut self, _id: CreatureId) {}

    fn on_pack_formed(&mut self, _pack: PackId, _leader: CreatureId, _size: usize) {}
}

/// Notifier that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl SpawnNotifier for NoopNotifier {}
