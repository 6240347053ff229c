//! Per-combat state: who is fighting, who cast what recently, and whose
//! turn it is.

mod ability;
pub mod attribution;
mod fighter;
mod registry;
pub mod turn_tracker;
pub mod validator;

#[cfg(test)]
mod turn_tracker_tests;

pub use ability::{Ability, AbilityCategory, DamageSource};
pub use attribution::{CastHistory, elapsed_ms};
pub use fighter::{Fighter, FighterKind, INDIRECT_FIGHTER_NAME};
pub use registry::FighterRegistry;
pub use turn_tracker::TurnTracker;
pub use validator::Rejection;
