use crate::context::{IStr, intern};
use crate::game_data::Element;

/// Placeholder name when damage lands but the caster's spell is not known.
pub const UNKNOWN_ABILITY_NAME: &str = "Inconnu";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageSource {
    Direct,
    Indirect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbilityCategory {
    /// A spell cast by name ("lance le sort")
    Spell,
    /// Named effect from a damage line's trailing parenthesis
    Effect,
    /// Damage without any known spell behind it
    Unknown,
}

/// A named action. The element starts unknown at cast time and is filled in
/// from the first damage line that reveals it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ability {
    pub name: IStr,
    pub category: AbilityCategory,
    pub element: Element,
    pub source: DamageSource,
}

impl Ability {
    pub fn spell(name: IStr) -> Self {
        Self {
            name,
            category: AbilityCategory::Spell,
            element: Element::Unknown,
            source: DamageSource::Direct,
        }
    }

    pub fn effect(name: IStr, element: Element, source: DamageSource) -> Self {
        Self {
            name,
            category: AbilityCategory::Effect,
            element,
            source,
        }
    }

    pub fn unknown(element: Element) -> Self {
        Self {
            name: intern(UNKNOWN_ABILITY_NAME),
            category: AbilityCategory::Unknown,
            element,
            source: DamageSource::Direct,
        }
    }

    /// Back-fill the element once; a known element is never overwritten.
    pub fn reveal_element(&mut self, element: Element) {
        if !self.element.is_known() && element.is_known() {
            self.element = element;
        }
    }
}
