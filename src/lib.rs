//! Wild Roam - wild creature spawning and behavior for tile-based overworlds

pub mod actions;
pub mod core;
pub mod entity;
pub mod simulation;
pub mod spatial;
pub mod spawn;
pub mod world;

pub use crate::core::config::{AiConfig, SpawnConfig, WildConfig};
pub use crate::core::error::{Result, WildError};
pub use crate::spawn::{SpawnManager, WildEvent};
