//! Combat lifecycle and the per-combat state it owns.
//!
//! - START wipes everything left over from the previous combat (an open
//!   cast is discarded, not emitted) and emits `BattleState::Start`
//! - END flushes the open cast first, then emits `BattleState::End`
//!
//! Outside a combat every other line is ignored.

use chrono::NaiveTime;

use crate::encounter::{CastHistory, FighterRegistry, TurnTracker};
use crate::spell_cast::SpellCastAggregator;
use wakmeter_types::EngineConfig;

use super::event::{BattleEvent, BattleState, LogEvent};

#[derive(Debug)]
pub struct CombatState {
    pub in_combat: bool,
    /// Id from the end-of-fight line, kept for diagnostics
    pub last_fight_id: Option<u64>,
    pub registry: FighterRegistry,
    pub history: CastHistory,
    pub tracker: TurnTracker,
    pub aggregator: SpellCastAggregator,
}

impl CombatState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            in_combat: false,
            last_fight_id: None,
            registry: FighterRegistry::new(),
            history: CastHistory::new(&config.attribution),
            tracker: TurnTracker::new(),
            aggregator: SpellCastAggregator::new(config.debounce_ms),
        }
    }

    pub fn start(&mut self, now: NaiveTime) -> Vec<LogEvent> {
        if self.in_combat {
            tracing::warn!("Combat start while a combat is running, discarding its state");
        }

        self.registry.clear();
        self.history.clear();
        self.tracker.reset();
        self.aggregator.reset();
        self.in_combat = true;

        tracing::info!(%now, previous_fight = ?self.last_fight_id, "Combat started");
        vec![LogEvent::Battle(BattleEvent::new(now, BattleState::Start))]
    }

    pub fn end(&mut self, fight_id: Option<u64>, now: NaiveTime) -> Vec<LogEvent> {
        if !self.in_combat {
            tracing::debug!(?fight_id, "Combat end outside of a combat, ignoring");
            return Vec::new();
        }

        let mut events = self.aggregator.flush_current_spell_cast();
        events.push(LogEvent::Battle(BattleEvent::new(now, BattleState::End)));

        self.in_combat = false;
        self.last_fight_id = fight_id.or(self.last_fight_id);

        tracing::info!(
            %now,
            ?fight_id,
            rounds = self.tracker.round(),
            fighters = self.registry.len(),
            "Combat ended"
        );
        events
    }
}
