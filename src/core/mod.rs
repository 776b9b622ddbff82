pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::{TimeOfDay, WorldClock};
pub use config::{AiConfig, SpawnConfig, WildConfig};
