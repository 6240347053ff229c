use chrono::NaiveTime;

use crate::context::{IStr, resolve};
use crate::encounter::{Ability, DamageSource, Fighter};
use crate::game_data::Element;
use crate::spell_cast::CastId;

/// Events emitted by the CombatInterpreter, in emission order.
/// Lifecycle signals always precede the combat facts that depend on them.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEvent {
    Battle(BattleEvent),
    Combat(CombatEvent),
    BonusDamage(BonusDamageEvent),
}

impl LogEvent {
    pub fn timestamp(&self) -> NaiveTime {
        match self {
            Self::Battle(e) => e.timestamp,
            Self::Combat(e) => e.timestamp,
            Self::BonusDamage(e) => e.timestamp,
        }
    }

    pub fn as_battle(&self) -> Option<&BattleEvent> {
        match self {
            Self::Battle(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_combat(&self) -> Option<&CombatEvent> {
        match self {
            Self::Combat(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_bonus_damage(&self) -> Option<&BonusDamageEvent> {
        match self {
            Self::BonusDamage(e) => Some(e),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleState {
    Start,
    End,
    RoundStart { round: u32 },
    RoundEnd { round: u32 },
    StartTurn { player: IStr },
    EndTurn { player: IStr },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleEvent {
    pub timestamp: NaiveTime,
    pub state: BattleState,
}

impl BattleEvent {
    pub fn new(timestamp: NaiveTime, state: BattleState) -> Self {
        Self { timestamp, state }
    }

    /// Round number for round events
    pub fn round(&self) -> Option<u32> {
        match self.state {
            BattleState::RoundStart { round } | BattleState::RoundEnd { round } => Some(round),
            _ => None,
        }
    }

    /// Player name for turn events
    pub fn player_name(&self) -> Option<&'static str> {
        match self.state {
            BattleState::StartTurn { player } | BattleState::EndTurn { player } => {
                Some(resolve(player))
            }
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Combat facts
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Damage,
    Heal,
    Shield,
}

/// One damage/heal/shield instance of a flushed spell cast.
/// All events of the same cast share `cast_id`, `ability` and the cost fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatEvent {
    pub timestamp: NaiveTime,
    pub caster: Fighter,
    pub target: Fighter,
    pub ability: Ability,
    pub kind: EventKind,
    pub value: u64,
    pub element: Element,
    pub source: DamageSource,
    pub base_cost: Option<u32>,
    pub refunded_cost: u32,
    pub cast_id: CastId,
}

/// Secondary damage layered onto a cast (an effect reassigned to the caster).
#[derive(Debug, Clone, PartialEq)]
pub struct BonusDamageEvent {
    pub timestamp: NaiveTime,
    pub caster: Fighter,
    pub target: Fighter,
    pub effect_name: IStr,
    pub element: Element,
    pub value: u64,
    pub cast_id: CastId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::intern;

    #[test]
    fn test_battle_event_accessors() {
        let at = NaiveTime::from_hms_opt(0, 49, 15).unwrap();
        let round = BattleEvent::new(at, BattleState::RoundEnd { round: 2 });
        let turn = BattleEvent::new(at, BattleState::StartTurn { player: intern("Portailier") });
        let start = BattleEvent::new(at, BattleState::Start);

        assert_eq!(round.round(), Some(2));
        assert_eq!(round.player_name(), None);
        assert_eq!(turn.player_name(), Some("Portailier"));
        assert_eq!(turn.round(), None);
        assert_eq!(start.round(), None);
        assert_eq!(start.player_name(), None);
    }
}
