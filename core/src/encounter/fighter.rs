use crate::context::{IStr, intern, resolve};
use crate::game_data::PlayerClass;

/// Name of the synthetic caster credited with damage nobody can be tied to.
pub const INDIRECT_FIGHTER_NAME: &str = "Indirect";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FighterKind {
    Player,
    Enemy,
}

/// A combat participant. Identity is the display name within one combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fighter {
    pub name: IStr,
    /// Absent for synthetic fighters and targets seen without a join line
    pub id: Option<i64>,
    pub kind: FighterKind,
    pub class: Option<PlayerClass>,
}

impl Fighter {
    pub fn player(name: IStr, id: Option<i64>, class: Option<PlayerClass>) -> Self {
        Self {
            name,
            id,
            kind: FighterKind::Player,
            class,
        }
    }

    pub fn enemy(name: IStr, id: Option<i64>) -> Self {
        Self {
            name,
            id,
            kind: FighterKind::Enemy,
            class: None,
        }
    }

    /// Sentinel pseudo-player for unattributable damage.
    pub fn indirect() -> Self {
        Self::player(intern(INDIRECT_FIGHTER_NAME), None, None)
    }

    /// Only players produce scored combat events.
    pub fn is_player(&self) -> bool {
        self.kind == FighterKind::Player
    }

    pub fn is_synthetic(&self) -> bool {
        self.id.is_none()
    }

    pub fn display_name(&self) -> &'static str {
        resolve(self.name)
    }
}
