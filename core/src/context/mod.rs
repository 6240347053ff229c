mod background_tasks;
mod config;
mod engine;
mod error;
mod interner;

#[cfg(test)]
mod engine_tests;

pub use background_tasks::BackgroundTasks;
pub use config::{AttributionConfig, EngineConfig, EngineConfigExt, ReaderConfig};
pub use engine::{CombatLogEngine, load_spell_costs};
pub use error::ConfigError;
pub use interner::{IStr, intern, resolve};
