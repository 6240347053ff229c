use chrono::NaiveTime;

use crate::context::{IStr, resolve};
use crate::game_data::Element;

/// The shapes a combat log line can take, with the fields captured from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLine {
    CombatStart,
    CombatEnd {
        fight_id: Option<u64>,
    },
    Join {
        fight_id: u64,
        name: IStr,
        breed: Option<u32>,
        id: i64,
        is_ai_controlled: bool,
    },
    Ko {
        fighter: IStr,
    },
    Revived {
        fighter: IStr,
    },
    TurnEnd {
        fighter: IStr,
    },
    Cast {
        caster: IStr,
        spell: IStr,
    },
    /// Damage whose parenthesis holds only element tokens (or nothing)
    DirectDamage {
        target: IStr,
        value: u64,
        element: Element,
    },
    /// Damage carrying a named effect in its parenthesis
    IndirectDamage {
        target: IStr,
        value: u64,
        element: Element,
        effect: IStr,
    },
    Heal {
        target: IStr,
        value: u64,
        element: Element,
    },
    Shield {
        target: IStr,
        value: u64,
        effect: Option<IStr>,
    },
    PaRegain {
        fighter: IStr,
        amount: u32,
    },
    Unrecognized,
}

impl LogLine {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }

    /// Short label for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::CombatStart => "combat_start",
            Self::CombatEnd { .. } => "combat_end",
            Self::Join { .. } => "join",
            Self::Ko { .. } => "ko",
            Self::Revived { .. } => "revived",
            Self::TurnEnd { .. } => "turn_end",
            Self::Cast { .. } => "cast",
            Self::DirectDamage { .. } => "direct_damage",
            Self::IndirectDamage { .. } => "indirect_damage",
            Self::Heal { .. } => "heal",
            Self::Shield { .. } => "shield",
            Self::PaRegain { .. } => "pa_regain",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Name of the fighter the line is about, if any.
    pub fn subject(&self) -> Option<&'static str> {
        match *self {
            Self::Join { name, .. } => Some(resolve(name)),
            Self::Ko { fighter }
            | Self::Revived { fighter }
            | Self::TurnEnd { fighter }
            | Self::PaRegain { fighter, .. } => Some(resolve(fighter)),
            Self::Cast { caster, .. } => Some(resolve(caster)),
            Self::DirectDamage { target, .. }
            | Self::IndirectDamage { target, .. }
            | Self::Heal { target, .. }
            | Self::Shield { target, .. } => Some(resolve(target)),
            Self::CombatStart | Self::CombatEnd { .. } | Self::Unrecognized => None,
        }
    }
}

/// A classified line plus the in-band timestamp, when the prefix was readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLine {
    pub timestamp: Option<NaiveTime>,
    pub line: LogLine,
}
