pub mod creature;
pub mod personality;

pub use creature::{Body, Creature};
pub use personality::Traits;
