//! World and player collaborators

pub mod collaborators;
pub mod grid_world;

pub use collaborators::{Biome, Collaborators, PlayerView, WorldView};
pub use grid_world::{GridWorld, SharedPlayer};
