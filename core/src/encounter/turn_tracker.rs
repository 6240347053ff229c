//! Turn and round inference.
//!
//! The log never announces turns or rounds. A player's first cast after
//! someone else acted starts their turn; a round ends when one of these holds
//! (checked in order, each requiring at least two distinct actors):
//! - the round's opener acts again
//! - the same player starts two turns in a row
//! - every live player has acted

use chrono::NaiveTime;
use hashbrown::HashSet;

use crate::context::{IStr, resolve};
use crate::signal_processor::{BattleEvent, BattleState};

use super::registry::FighterRegistry;

#[derive(Debug)]
pub struct TurnTracker {
    current: Option<IStr>,
    round: u32,
    acted_this_round: HashSet<IStr>,
    turn_order: Vec<IStr>,
    ko: HashSet<IStr>,
    opener: Option<IStr>,
}

impl Default for TurnTracker {
    fn default() -> Self {
        Self {
            current: None,
            round: 1,
            acted_this_round: HashSet::new(),
            turn_order: Vec::new(),
            ko: HashSet::new(),
            opener: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundCompletion {
    OpenerReturned,
    RepeatedTurn,
    EveryoneActed,
}

impl TurnTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A live player cast a spell.
    pub fn player_acted(
        &mut self,
        player: IStr,
        registry: &FighterRegistry,
        now: NaiveTime,
    ) -> Vec<BattleEvent> {
        if self.ko.contains(&player) {
            tracing::debug!(player = resolve(player), "Ignoring cast from KO player");
            return Vec::new();
        }
        if self.current == Some(player) {
            return Vec::new();
        }

        let mut events = Vec::new();

        if self.acted_this_round.is_empty() {
            self.opener = Some(player);
            events.push(BattleEvent::new(now, BattleState::RoundStart { round: self.round }));
            tracing::debug!(round = self.round, "Round start");
        }

        if let Some(previous) = self.current.take() {
            events.push(BattleEvent::new(now, BattleState::EndTurn { player: previous }));
        }

        self.current = Some(player);
        self.acted_this_round.insert(player);
        self.turn_order.push(player);
        events.push(BattleEvent::new(now, BattleState::StartTurn { player }));

        if let Some(reason) = self.round_completion(player, registry) {
            events.push(BattleEvent::new(now, BattleState::RoundEnd { round: self.round }));
            tracing::debug!(round = self.round, ?reason, "Round end");

            self.round += 1;
            self.acted_this_round.clear();
            self.turn_order.clear();
            self.opener = Some(player);
        }

        events
    }

    fn round_completion(&self, player: IStr, registry: &FighterRegistry) -> Option<RoundCompletion> {
        let distinct = self.acted_this_round.len();
        if distinct < 2 {
            return None;
        }

        if self.opener == Some(player) {
            return Some(RoundCompletion::OpenerReturned);
        }

        if let [.., a, b] = self.turn_order.as_slice()
            && a == b
        {
            return Some(RoundCompletion::RepeatedTurn);
        }

        let alive = registry.count_active_players(&self.ko);
        if alive >= 2 && distinct >= alive {
            return Some(RoundCompletion::EveryoneActed);
        }

        None
    }

    /// Mark a player KO. Ends their turn if they were acting.
    pub fn mark_ko(&mut self, player: IStr, now: NaiveTime) -> Vec<BattleEvent> {
        self.ko.insert(player);
        self.end_turn_of(player, now)
    }

    pub fn revive(&mut self, player: IStr) {
        if self.ko.remove(&player) {
            tracing::debug!(player = resolve(player), "Player revived");
        }
    }

    /// Explicit end-of-turn marker in the log.
    pub fn turn_ended(&mut self, player: IStr, now: NaiveTime) -> Vec<BattleEvent> {
        self.end_turn_of(player, now)
    }

    fn end_turn_of(&mut self, player: IStr, now: NaiveTime) -> Vec<BattleEvent> {
        if self.current != Some(player) {
            return Vec::new();
        }
        self.current = None;
        vec![BattleEvent::new(now, BattleState::EndTurn { player })]
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn current_player(&self) -> Option<IStr> {
        self.current
    }

    pub fn is_ko(&self, player: IStr) -> bool {
        self.ko.contains(&player)
    }

    pub fn ko_players(&self) -> &HashSet<IStr> {
        &self.ko
    }
}
