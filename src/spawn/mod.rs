//! Population management: where, what and how many creatures spawn

pub mod events;
pub mod level;
pub mod manager;
pub mod pack;
pub mod species;
pub mod sync;

pub use events::{DespawnReason, NoopNotifier, SpawnNotifier, WildEvent};
pub use manager::SpawnManager;
pub use pack::Pack;
pub use species::{BiomeSpawns, PackProfile, SpeciesTable};
pub use sync::{NetworkSpawn, NetworkUpdate, SyncRegistry, SyncSnapshot};
