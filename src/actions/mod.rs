pub mod catalog;

pub use catalog::{BehaviorCategory, BehaviorId};
