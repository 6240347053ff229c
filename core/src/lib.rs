pub mod combat_log;
pub mod context;
pub mod encounter;
pub mod game_data;
pub mod signal_processor;
pub mod spell_cast;

// Re-exports for convenience
pub use combat_log::*;
pub use context::{BackgroundTasks, CombatLogEngine, ConfigError, EngineConfigExt, IStr, intern, resolve};
pub use encounter::{Ability, AbilityCategory, DamageSource, Fighter, FighterKind, FighterRegistry};
pub use game_data::{Element, JsonSpellCosts, NoSpellCosts, PlayerClass, SpellCosts};
pub use signal_processor::{
    BattleEvent, BattleState, BonusDamageEvent, CombatEvent, CombatInterpreter, EventHandler,
    EventKind, LogEvent,
};
pub use spell_cast::{CastId, SpellCast, SpellCastAggregator};
pub use wakmeter_types::{AttributionConfig, EngineConfig, ReaderConfig};
