pub mod event;
pub mod handler;
pub mod processor;

mod combat_state;


pub use combat_state::CombatState;
pub use event::{BattleEvent, BattleState, BonusDamageEvent, CombatEvent, EventKind, LogEvent};
pub use handler::EventHandler;
pub use processor::CombatInterpreter;
