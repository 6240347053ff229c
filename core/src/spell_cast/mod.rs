//! Debounced aggregation of a spell cast with the lines that follow it.

mod aggregate;
mod aggregator;


pub use aggregate::{BonusDamageInstance, CastId, DamageInstance, SpellCast};
pub use aggregator::SpellCastAggregator;
