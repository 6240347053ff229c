use std::fmt;

use chrono::NaiveTime;

use crate::context::IStr;
use crate::encounter::{Ability, Fighter};
use crate::game_data::Element;
use crate::signal_processor::{BonusDamageEvent, CombatEvent, EventKind, LogEvent};

/// Correlation id shared by every event emitted for one cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CastId(pub u64);

impl fmt::Display for CastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cast-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DamageInstance {
    pub timestamp: NaiveTime,
    pub target: Fighter,
    pub value: u64,
    pub element: Element,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BonusDamageInstance {
    pub timestamp: NaiveTime,
    pub effect_name: IStr,
    pub target: Fighter,
    pub value: u64,
    pub element: Element,
}

/// A spell cast and everything merged into it while it was open.
#[derive(Debug, Clone, PartialEq)]
pub struct SpellCast {
    pub id: CastId,
    pub timestamp: NaiveTime,
    pub caster: Fighter,
    pub ability: Ability,
    pub base_cost: Option<u32>,
    pub refunded_cost: u32,
    pub damage: Vec<DamageInstance>,
    pub bonus_damage: Vec<BonusDamageInstance>,
}

impl SpellCast {
    pub fn new(
        id: CastId,
        timestamp: NaiveTime,
        caster: Fighter,
        ability: Ability,
        base_cost: Option<u32>,
    ) -> Self {
        Self {
            id,
            timestamp,
            caster,
            ability,
            base_cost,
            refunded_cost: 0,
            damage: Vec::new(),
            bonus_damage: Vec::new(),
        }
    }

    pub fn add_damage(&mut self, instance: DamageInstance) {
        if instance.kind == EventKind::Damage {
            self.ability.reveal_element(instance.element);
        }
        self.damage.push(instance);
    }

    pub fn add_bonus_damage(&mut self, instance: BonusDamageInstance) {
        self.bonus_damage.push(instance);
    }

    pub fn add_pa_regain(&mut self, amount: u32) {
        self.refunded_cost = self.refunded_cost.saturating_add(amount);
    }

    pub fn total_damage(&self) -> u64 {
        self.damage.iter().map(|d| d.value).sum()
    }

    pub fn total_bonus_damage(&self) -> u64 {
        self.bonus_damage.iter().map(|d| d.value).sum()
    }

    /// Nothing worth reporting: no damage/heal/shield and no bonus damage.
    pub fn is_empty(&self) -> bool {
        self.damage.is_empty() && self.bonus_damage.is_empty()
    }

    /// One CombatEvent per instance, then one BonusDamageEvent per bonus instance.
    pub fn into_events(self) -> Vec<LogEvent> {
        let Self {
            id,
            caster,
            ability,
            base_cost,
            refunded_cost,
            damage,
            bonus_damage,
            ..
        } = self;

        let mut events = Vec::with_capacity(damage.len() + bonus_damage.len());

        events.extend(damage.into_iter().map(|d| {
            LogEvent::Combat(CombatEvent {
                timestamp: d.timestamp,
                caster,
                target: d.target,
                ability,
                kind: d.kind,
                value: d.value,
                element: d.element,
                source: ability.source,
                base_cost,
                refunded_cost,
                cast_id: id,
            })
        }));

        events.extend(bonus_damage.into_iter().map(|b| {
            LogEvent::BonusDamage(BonusDamageEvent {
                timestamp: b.timestamp,
                caster,
                target: b.target,
                effect_name: b.effect_name,
                element: b.element,
                value: b.value,
                cast_id: id,
            })
        }));

        events
    }
}
