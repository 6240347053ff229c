use std::fmt;

use super::fold_name;

/// Damage element as printed in the trailing parenthesis of a damage line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Element {
    Feu,
    Eau,
    Terre,
    Air,
    Lumiere,
    Stasis,
    Neutre,
    #[default]
    Unknown,
}

impl Element {
    /// Parse an element token. Case and accent insensitive; anything else is `Unknown`.
    pub fn from_token(token: &str) -> Self {
        match fold_name(token).as_str() {
            "feu" => Self::Feu,
            "eau" => Self::Eau,
            "terre" => Self::Terre,
            "air" => Self::Air,
            "lumiere" => Self::Lumiere,
            "stasis" => Self::Stasis,
            "neutre" => Self::Neutre,
            _ => Self::Unknown,
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Feu => "Feu",
            Self::Eau => "Eau",
            Self::Terre => "Terre",
            Self::Air => "Air",
            Self::Lumiere => "Lumière",
            Self::Stasis => "Stasis",
            Self::Neutre => "Neutre",
            Self::Unknown => "Inconnu",
        };
        f.write_str(name)
    }
}
