//! Creature AI: controller, behavior catalog and movement helpers

pub mod behaviors;
pub mod controller;
pub mod movement;
pub mod neighbors;

pub use controller::{AiController, AiMode, AiState, Cooldowns, InteractionFlavor, PatrolRoute, SocialInteraction, Territory};
pub use neighbors::{NeighborInfo, Neighborhood, PopulationSnapshot};
